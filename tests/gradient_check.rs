// Finite-difference checks of the analytic gradients from `Network::backward`.
//
// Each parameter is nudged by ±EPS, the quadratic cost is re-evaluated, and
// the central difference is compared with the backpropagated value.

use ferrite_digits::{Network, NetworkShape};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f32 = 1e-2;
const RELATIVE_TOLERANCE: f64 = 1e-3;
const ABSOLUTE_FLOOR: f64 = 0.05;

/// Parameter arrays in `from_parameters` order.
fn parameters(net: &Network) -> [Vec<f32>; 4] {
    [
        net.hidden_weights().to_vec(),
        net.hidden_biases().to_vec(),
        net.output_weights().to_vec(),
        net.output_biases().to_vec(),
    ]
}

fn rebuild(shape: NetworkShape, p: [Vec<f32>; 4]) -> Network {
    let [hw, hb, ow, ob] = p;
    Network::from_parameters(shape, hw, hb, ow, ob).unwrap()
}

fn cost(net: &Network, input: &[f32], label: usize) -> f64 {
    net.forward(input).unwrap().cost(label)
}

/// Central difference for parameter `index` of array `which`.
fn numerical(net: &Network, which: usize, index: usize, input: &[f32], label: usize) -> f64 {
    let shape = net.shape();
    let base = parameters(net)[which][index];

    let mut plus = parameters(net);
    plus[which][index] = base + EPS;
    let mut minus = parameters(net);
    minus[which][index] = base - EPS;

    let step = (plus[which][index] - minus[which][index]) as f64;
    let c_plus = cost(&rebuild(shape, plus), input, label);
    let c_minus = cost(&rebuild(shape, minus), input, label);
    (c_plus - c_minus) / step
}

fn assert_gradients_match(net: &Network, input: &[f32], label: usize) {
    let activations = net.forward(input).unwrap();
    let grads = net.backward(&activations, label).unwrap();
    let analytic = [
        &grads.hidden_weights,
        &grads.hidden_biases,
        &grads.output_weights,
        &grads.output_biases,
    ];
    let names = ["hidden weight", "hidden bias", "output weight", "output bias"];

    for (which, values) in analytic.iter().enumerate() {
        for (index, &a) in values.iter().enumerate() {
            let a = a as f64;
            let n = numerical(net, which, index, input, label);
            let scale = a.abs().max(n.abs()).max(ABSOLUTE_FLOOR);
            assert!(
                (a - n).abs() <= RELATIVE_TOLERANCE * scale,
                "{} {}: analytic {:.8} vs numerical {:.8}",
                names[which], index, a, n
            );
        }
    }
}

#[test]
fn gradients_match_finite_differences() {
    let shape = NetworkShape::new(3, 4, 2).unwrap();
    let net = Network::random(shape, &mut StdRng::seed_from_u64(2024));
    let input: [f32; 3] = [0.3, 0.8, 0.1];
    assert_gradients_match(&net, &input, 0);
    assert_gradients_match(&net, &input, 1);
}

#[test]
fn gradients_match_for_several_initializations() {
    let shape = NetworkShape::new(3, 4, 2).unwrap();
    let inputs: [[f32; 3]; 3] = [[0.0, 0.5, 1.0], [0.9, 0.1, 0.4], [0.25, 0.25, 0.75]];
    for seed in 0..4u64 {
        let net = Network::random(shape, &mut StdRng::seed_from_u64(seed));
        for (i, input) in inputs.iter().enumerate() {
            assert_gradients_match(&net, input, i % 2);
        }
    }
}

#[test]
fn gradients_match_with_three_classes() {
    let shape = NetworkShape::new(2, 3, 3).unwrap();
    let net = Network::from_parameters(
        shape,
        vec![0.5, -0.4, -0.3, 0.6, 0.2, 0.1],
        vec![0.1, -0.1, 0.0],
        vec![0.3, -0.2, 0.4, -0.1, 0.5, -0.3, 0.7, 0.0, -0.6],
        vec![0.0, 0.2, -0.2],
    )
    .unwrap();
    let input: [f32; 2] = [0.6, 0.2];
    for label in 0..3 {
        assert_gradients_match(&net, &input, label);
    }
}
