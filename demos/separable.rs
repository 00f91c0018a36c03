/// Toy example: two linearly separable clusters in the unit square.
///
/// Architecture: 2 → 3 (sigmoid) → 2 (sigmoid)
/// Data:         (0,0), (0.2,0.1) → class 0;  (1,1), (0.8,0.9) → class 1
/// Optimizer:    mini-batch SGD, one batch of all four points, lr = 3.0
///
/// Run with:
///   cargo run --example separable

use std::error::Error;

use ferrite_digits::train::{accuracy, Trainer};
use ferrite_digits::{InMemoryDataset, Network, NetworkShape};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn Error>> {
    let points: Vec<(Vec<f32>, u8)> = vec![
        (vec![0.0, 0.0], 0),
        (vec![0.2, 0.1], 0),
        (vec![1.0, 1.0], 1),
        (vec![0.8, 0.9], 1),
    ];
    let dataset = InMemoryDataset::from_samples(&points)?;

    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::random(NetworkShape::new(2, 3, 2)?, &mut rng);
    let mut trainer = Trainer::new(rng);

    println!("Training 2-3-2 network on four separable points...");
    for epoch in 1..=300 {
        let summary = trainer.train(&mut network, &dataset, 4, 3.0)?;
        if epoch % 50 == 0 {
            println!("  epoch {:>3}  cost {:.6}", epoch, summary.mean_cost);
        }
    }

    println!("\nResults:");
    for (input, label) in &points {
        let activations = network.forward(input)?;
        println!(
            "  {:?} → outputs [{:.4}, {:.4}]  predicted {}  expected {}",
            input,
            activations.output()[0],
            activations.output()[1],
            activations.predicted_label(),
            label
        );
    }
    println!("accuracy {:.0}%", accuracy(&network, &dataset)? * 100.0);
    Ok(())
}
