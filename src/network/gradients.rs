use crate::error::NetworkError;
use crate::network::shape::NetworkShape;

/// ∂C/∂p for every parameter, laid out exactly like the network's own
/// weight and bias arrays.
///
/// Used both for a single sample's gradients and as a mini-batch accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    shape: NetworkShape,
    pub hidden_weights: Vec<f32>,
    pub hidden_biases: Vec<f32>,
    pub output_weights: Vec<f32>,
    pub output_biases: Vec<f32>,
}

impl Gradients {
    pub fn zeros(shape: NetworkShape) -> Gradients {
        Gradients {
            shape,
            hidden_weights: vec![0.0; shape.hidden_weight_count()],
            hidden_biases: vec![0.0; shape.hidden],
            output_weights: vec![0.0; shape.output_weight_count()],
            output_biases: vec![0.0; shape.outputs],
        }
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    /// Resets every entry to zero without reallocating.
    pub fn clear(&mut self) {
        self.hidden_weights.fill(0.0);
        self.hidden_biases.fill(0.0);
        self.output_weights.fill(0.0);
        self.output_biases.fill(0.0);
    }

    /// Element-wise `self += other`.
    pub fn accumulate(&mut self, other: &Gradients) -> Result<(), NetworkError> {
        self.check_shape(other.shape)?;
        other.check_shape(self.shape)?;
        add_into(&mut self.hidden_weights, &other.hidden_weights);
        add_into(&mut self.hidden_biases, &other.hidden_biases);
        add_into(&mut self.output_weights, &other.output_weights);
        add_into(&mut self.output_biases, &other.output_biases);
        Ok(())
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for v in self.values_mut() {
            *v *= factor;
        }
    }

    /// All entries in parameter order: hidden weights, hidden biases,
    /// output weights, output biases.
    pub fn values(&self) -> impl Iterator<Item = &f32> {
        self.hidden_weights.iter()
            .chain(self.hidden_biases.iter())
            .chain(self.output_weights.iter())
            .chain(self.output_biases.iter())
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.hidden_weights.iter_mut()
            .chain(self.hidden_biases.iter_mut())
            .chain(self.output_weights.iter_mut())
            .chain(self.output_biases.iter_mut())
    }

    /// Fails unless the buffer belongs to `shape` and every array still has
    /// the length that shape implies. The arrays are public, so their lengths
    /// are checked as well as the tag.
    pub(crate) fn check_shape(&self, shape: NetworkShape) -> Result<(), NetworkError> {
        if self.shape != shape {
            return Err(NetworkError::ShapeMismatch {
                expected: shape.parameter_count(),
                actual: self.shape.parameter_count(),
            });
        }
        let lengths = [
            (shape.hidden_weight_count(), self.hidden_weights.len()),
            (shape.hidden, self.hidden_biases.len()),
            (shape.output_weight_count(), self.output_weights.len()),
            (shape.outputs, self.output_biases.len()),
        ];
        for (expected, actual) in lengths {
            if expected != actual {
                return Err(NetworkError::ShapeMismatch { expected, actual });
            }
        }
        Ok(())
    }
}

fn add_into(acc: &mut [f32], values: &[f32]) {
    for (a, v) in acc.iter_mut().zip(values.iter()) {
        *a += v;
    }
}
