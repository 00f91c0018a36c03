use rand::Rng;
use rand_distr::StandardNormal;

use crate::activation::sigmoid;

/// A fully-connected sigmoid layer.
///
/// `weights` is stored row-major by destination neuron: the weight from
/// source `i` into neuron `j` lives at `j * inputs + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    pub inputs: usize,
    pub size: usize,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

impl DenseLayer {
    pub fn zeros(size: usize, inputs: usize) -> DenseLayer {
        DenseLayer {
            inputs,
            size,
            weights: vec![0.0; inputs * size],
            biases: vec![0.0; size],
        }
    }

    #[inline]
    pub fn weight_index(&self, source: usize, dest: usize) -> usize {
        dest * self.inputs + source
    }

    #[inline]
    pub fn weight(&self, source: usize, dest: usize) -> f32 {
        self.weights[self.weight_index(source, dest)]
    }

    /// Computes `σ(W·input + b)` into `out`.
    ///
    /// Callers guarantee `input.len() == self.inputs` and `out.len() == self.size`.
    pub fn feed_from(&self, input: &[f32], out: &mut [f32]) {
        for (dest, (o, &bias)) in out.iter_mut().zip(self.biases.iter()).enumerate() {
            let row = &self.weights[dest * self.inputs..(dest + 1) * self.inputs];
            let z = row.iter().zip(input.iter())
                .fold(bias, |acc, (w, x)| acc + x * w);
            *o = sigmoid(z);
        }
    }

    /// `p -= grad * lr` for every weight and bias.
    pub fn apply_gradients(&mut self, weights_grad: &[f32], biases_grad: &[f32], lr: f32) {
        for (w, g) in self.weights.iter_mut().zip(weights_grad.iter()) {
            *w -= g * lr;
        }
        for (b, g) in self.biases.iter_mut().zip(biases_grad.iter()) {
            *b -= g * lr;
        }
    }
}

/// Overwrites every value with an independent draw from N(0, 1).
pub fn fill_standard_normal<R: Rng + ?Sized>(values: &mut [f32], rng: &mut R) {
    for v in values.iter_mut() {
        *v = rng.sample(StandardNormal);
    }
}
