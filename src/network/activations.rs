use crate::loss::QuadraticCost;

/// Snapshot of one forward pass.
///
/// Holds the input it was computed from and the parameter generation it was
/// computed against, so the backward pass can only ever be fed activations
/// that match the network's current weights.
#[derive(Debug, Clone)]
pub struct Activations<'a> {
    pub(crate) input: &'a [f32],
    pub(crate) hidden: Vec<f32>,
    pub(crate) output: Vec<f32>,
    pub(crate) label: usize,
    pub(crate) generation: u64,
}

impl<'a> Activations<'a> {
    pub fn input(&self) -> &'a [f32] {
        self.input
    }

    /// Sigmoid outputs of the hidden layer.
    pub fn hidden(&self) -> &[f32] {
        &self.hidden
    }

    /// Sigmoid outputs of the output layer.
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    /// Index of the largest output; the lowest index wins a tie.
    pub fn predicted_label(&self) -> usize {
        self.label
    }

    /// Quadratic cost of this prediction against the true `label`.
    pub fn cost(&self, label: usize) -> f64 {
        QuadraticCost::cost(&self.output, label)
    }
}

/// Arg-max with a strict `>` scan, so the first of several equal maxima wins.
pub(crate) fn first_argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
