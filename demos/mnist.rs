/// MNIST digit classification example for ferrite-digits.
///
/// Architecture: 784 → 30 (sigmoid) → 10 (sigmoid)
/// Cost:         quadratic
/// Optimizer:    mini-batch SGD, lr = 3.0
/// Batch size:   10
/// Epochs:       30
///
/// Run with:
///   cargo run --example mnist --release -- [DATA_DIR]
///
/// DATA_DIR (default `mnist_data`) must hold the four IDX files as
/// distributed: train-images.idx3-ubyte, train-labels.idx1-ubyte,
/// t10k-images.idx3-ubyte, t10k-labels.idx1-ubyte.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use ferrite_digits::data::{load_mnist, Dataset, Split};
use ferrite_digits::logging::init_logging;
use ferrite_digits::train::{train_loop, AccuracyLog, EpochStats, TrainConfig, Trainer};
use ferrite_digits::{Network, NetworkShape};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn Error>> {
    init_logging(false)?;
    let data_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("mnist_data"));

    let train_set = load_mnist(&data_dir, Split::Training)?;
    let test_set = load_mnist(&data_dir, Split::Test)?;

    let mut rng = StdRng::from_entropy();
    let shape = NetworkShape::new(train_set.input_len(), 30, 10)?;
    let mut network = Network::random(shape, &mut rng);
    let mut trainer = Trainer::new(rng);

    // Progress is printed from a separate thread, the way a UI would consume it.
    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = thread::spawn(move || {
        for stats in rx {
            println!(
                "epoch {:>2}/{}  cost {:.4}  train {:>6.2}%  test {:>6.2}%  ({} ms)",
                stats.epoch,
                stats.total_epochs,
                stats.mean_cost,
                stats.training_accuracy.unwrap_or(0.0) * 100.0,
                stats.test_accuracy.unwrap_or(0.0) * 100.0,
                stats.elapsed_ms,
            );
        }
    });

    let mut config = TrainConfig::new(30, 10, 3.0);
    config.progress_tx = Some(tx);
    let mut log = AccuracyLog::create(Path::new("Error.csv"))?;

    let report = train_loop(&mut network, &mut trainer, &train_set, Some(&test_set), &config, Some(&mut log))?;
    drop(config);
    printer.join().map_err(|_| "progress printer thread panicked")?;

    println!(
        "final: train {:.2}%  test {:.2}%  in {:.1} s",
        report.final_training_accuracy * 100.0,
        report.final_test_accuracy.unwrap_or(0.0) * 100.0,
        report.elapsed_ms as f64 / 1000.0
    );

    network.export()?.save_json("WeightsBiasesJSON.txt")?;
    println!("parameters written to WeightsBiasesJSON.txt");
    Ok(())
}
