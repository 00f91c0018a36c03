use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Neuron counts of the three layers. Fixed for the lifetime of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl NetworkShape {
    /// Validates that every layer has at least one neuron.
    pub fn new(inputs: usize, hidden: usize, outputs: usize) -> Result<Self, NetworkError> {
        if inputs == 0 || hidden == 0 || outputs == 0 {
            return Err(NetworkError::config(format!(
                "every layer needs at least one neuron, got {}-{}-{}",
                inputs, hidden, outputs
            )));
        }
        Ok(NetworkShape { inputs, hidden, outputs })
    }

    pub fn hidden_weight_count(&self) -> usize {
        self.inputs * self.hidden
    }

    pub fn output_weight_count(&self) -> usize {
        self.hidden * self.outputs
    }

    /// Total number of trainable scalars (weights and biases of both layers).
    pub fn parameter_count(&self) -> usize {
        self.hidden_weight_count() + self.hidden + self.output_weight_count() + self.outputs
    }

    /// Index of the weight from input `source` into hidden neuron `dest`.
    #[inline]
    pub fn hidden_weight_index(&self, source: usize, dest: usize) -> usize {
        dest * self.inputs + source
    }

    /// Index of the weight from hidden neuron `source` into output neuron `dest`.
    #[inline]
    pub fn output_weight_index(&self, source: usize, dest: usize) -> usize {
        dest * self.hidden + source
    }
}

impl std::fmt::Display for NetworkShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.inputs, self.hidden, self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_layers() {
        assert!(matches!(NetworkShape::new(0, 3, 2), Err(NetworkError::Config(_))));
        assert!(matches!(NetworkShape::new(2, 0, 2), Err(NetworkError::Config(_))));
        assert!(matches!(NetworkShape::new(2, 3, 0), Err(NetworkError::Config(_))));
    }

    #[test]
    fn weight_indices_are_row_major_by_destination() {
        let shape = NetworkShape::new(4, 3, 2).unwrap();
        assert_eq!(shape.hidden_weight_index(0, 0), 0);
        assert_eq!(shape.hidden_weight_index(3, 0), 3);
        assert_eq!(shape.hidden_weight_index(0, 1), 4);
        assert_eq!(shape.hidden_weight_index(3, 2), 11);
        assert_eq!(shape.output_weight_index(2, 1), 5);
        assert_eq!(shape.parameter_count(), 12 + 3 + 6 + 2);
    }
}
