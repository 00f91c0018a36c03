use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use tracing::debug;

use crate::error::NetworkError;
use crate::layers::dense::{fill_standard_normal, DenseLayer};
use crate::network::activations::{first_argmax, Activations};
use crate::network::gradients::Gradients;
use crate::network::shape::NetworkShape;

/// Source of parameter generations. Every initialization or update takes a
/// fresh value, so a generation identifies one network's parameters at one
/// point in time.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// One-hidden-layer sigmoid classifier: `inputs → hidden → outputs`.
#[derive(Debug)]
pub struct Network {
    pub(crate) shape: NetworkShape,
    pub(crate) hidden: DenseLayer,
    pub(crate) output: DenseLayer,
    pub(crate) initialized: bool,
    pub(crate) generation: u64,
}

impl Network {
    /// Allocates zeroed parameters. The network refuses to run until
    /// [`Network::initialize`] has been called.
    pub fn new(shape: NetworkShape) -> Network {
        Network {
            shape,
            hidden: DenseLayer::zeros(shape.hidden, shape.inputs),
            output: DenseLayer::zeros(shape.outputs, shape.hidden),
            initialized: false,
            generation: next_generation(),
        }
    }

    /// `new` followed by `initialize`.
    pub fn random<R: Rng + ?Sized>(shape: NetworkShape, rng: &mut R) -> Network {
        let mut network = Network::new(shape);
        network.initialize(rng);
        network
    }

    /// Builds an initialized network from explicit parameter arrays, laid out
    /// as described on [`NetworkShape::hidden_weight_index`] and
    /// [`NetworkShape::output_weight_index`].
    pub fn from_parameters(
        shape: NetworkShape,
        hidden_weights: Vec<f32>,
        hidden_biases: Vec<f32>,
        output_weights: Vec<f32>,
        output_biases: Vec<f32>,
    ) -> Result<Network, NetworkError> {
        check_len(shape.hidden_weight_count(), hidden_weights.len())?;
        check_len(shape.hidden, hidden_biases.len())?;
        check_len(shape.output_weight_count(), output_weights.len())?;
        check_len(shape.outputs, output_biases.len())?;

        Ok(Network {
            shape,
            hidden: DenseLayer {
                inputs: shape.inputs,
                size: shape.hidden,
                weights: hidden_weights,
                biases: hidden_biases,
            },
            output: DenseLayer {
                inputs: shape.hidden,
                size: shape.outputs,
                weights: output_weights,
                biases: output_biases,
            },
            initialized: true,
            generation: next_generation(),
        })
    }

    /// Draws every weight and bias independently from N(0, 1).
    ///
    /// Draw order is hidden biases, output biases, hidden weights, output
    /// weights, so a seeded `rng` always yields the same network.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        fill_standard_normal(&mut self.hidden.biases, rng);
        fill_standard_normal(&mut self.output.biases, rng);
        fill_standard_normal(&mut self.hidden.weights, rng);
        fill_standard_normal(&mut self.output.weights, rng);
        self.initialized = true;
        self.generation = next_generation();
        debug!(shape = %self.shape, parameters = self.shape.parameter_count(), "initialized network");
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn hidden_weights(&self) -> &[f32] {
        &self.hidden.weights
    }

    pub fn hidden_biases(&self) -> &[f32] {
        &self.hidden.biases
    }

    pub fn output_weights(&self) -> &[f32] {
        &self.output.weights
    }

    pub fn output_biases(&self) -> &[f32] {
        &self.output.biases
    }

    /// Runs the input through both layers and returns the activations along
    /// with the predicted label.
    ///
    /// Nothing is cached on the network; the returned [`Activations`] is the
    /// only thing the backward pass accepts.
    pub fn forward<'a>(&self, input: &'a [f32]) -> Result<Activations<'a>, NetworkError> {
        self.ensure_initialized()?;
        if input.len() != self.shape.inputs {
            return Err(NetworkError::ShapeMismatch {
                expected: self.shape.inputs,
                actual: input.len(),
            });
        }

        let mut hidden = vec![0.0; self.shape.hidden];
        self.hidden.feed_from(input, &mut hidden);

        let mut output = vec![0.0; self.shape.outputs];
        self.output.feed_from(&hidden, &mut output);

        let label = first_argmax(&output);
        Ok(Activations {
            input,
            hidden,
            output,
            label,
            generation: self.generation,
        })
    }

    /// Predicted class for `input`.
    pub fn predict(&self, input: &[f32]) -> Result<usize, NetworkError> {
        Ok(self.forward(input)?.predicted_label())
    }

    /// Plain gradient descent: `p -= grad * learning_rate` for every
    /// parameter. Invalidates all outstanding [`Activations`].
    pub fn apply_gradients(&mut self, grads: &Gradients, learning_rate: f32) -> Result<(), NetworkError> {
        self.ensure_initialized()?;
        grads.check_shape(self.shape)?;
        self.hidden.apply_gradients(&grads.hidden_weights, &grads.hidden_biases, learning_rate);
        self.output.apply_gradients(&grads.output_weights, &grads.output_biases, learning_rate);
        self.generation = next_generation();
        Ok(())
    }

    pub(crate) fn ensure_initialized(&self) -> Result<(), NetworkError> {
        if self.initialized {
            Ok(())
        } else {
            Err(NetworkError::UninitializedParameters)
        }
    }
}

impl Clone for Network {
    /// A clone gets its own generation; activations from the source network are
    /// not accepted by the copy.
    fn clone(&self) -> Self {
        Network {
            shape: self.shape,
            hidden: self.hidden.clone(),
            output: self.output.clone(),
            initialized: self.initialized,
            generation: next_generation(),
        }
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), NetworkError> {
    if expected != actual {
        return Err(NetworkError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shape() -> NetworkShape {
        NetworkShape::new(2, 3, 2).unwrap()
    }

    #[test]
    fn uninitialized_network_refuses_to_run() {
        let network = Network::new(shape());
        assert_eq!(network.forward(&[0.0, 1.0]).unwrap_err(), NetworkError::UninitializedParameters);
    }

    #[test]
    fn forward_rejects_wrong_input_length() {
        let network = Network::random(shape(), &mut StdRng::seed_from_u64(1));
        let err = network.forward(&[0.0, 1.0, 0.5]).unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn initialization_is_reproducible_and_nonzero() {
        let a = Network::random(shape(), &mut StdRng::seed_from_u64(7));
        let b = Network::random(shape(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a.hidden_weights(), b.hidden_weights());
        assert_eq!(a.output_biases(), b.output_biases());
        assert!(a.hidden_weights().iter().any(|&w| w != 0.0));
    }

    #[test]
    fn initialization_is_roughly_standard_normal() {
        let big = NetworkShape::new(100, 50, 10).unwrap();
        let network = Network::random(big, &mut StdRng::seed_from_u64(3));
        let values = network.hidden_weights();
        let n = values.len() as f64;
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.07, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.1, "variance {}", var);
    }

    #[test]
    fn from_parameters_validates_lengths() {
        let err = Network::from_parameters(shape(), vec![0.0; 5], vec![0.0; 3], vec![0.0; 6], vec![0.0; 2])
            .unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { expected: 6, actual: 5 });
    }

    #[test]
    fn tie_picks_lowest_index() {
        let three = NetworkShape::new(2, 2, 3).unwrap();
        // Zero weights: every output is σ(bias). Outputs 1 and 2 tie above output 0.
        let network = Network::from_parameters(
            three,
            vec![0.0; 4],
            vec![0.0; 2],
            vec![0.0; 6],
            vec![0.0, 1.0, 1.0],
        ).unwrap();
        let act = network.forward(&[0.3, 0.8]).unwrap();
        assert_eq!(act.output()[1], act.output()[2]);
        assert_eq!(act.predicted_label(), 1);

        let flat = Network::from_parameters(three, vec![0.0; 4], vec![0.0; 2], vec![0.0; 6], vec![0.0; 3])
            .unwrap();
        assert_eq!(flat.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn forward_matches_hand_computation() {
        let network = Network::from_parameters(
            NetworkShape::new(2, 1, 1).unwrap(),
            vec![1.0, -1.0],
            vec![0.5],
            vec![2.0],
            vec![-1.0],
        ).unwrap();
        let act = network.forward(&[1.0, 0.5]).unwrap();
        let h = crate::activation::sigmoid(0.5 + 1.0 - 0.5);
        assert_eq!(act.hidden(), &[h]);
        assert_eq!(act.output(), &[crate::activation::sigmoid(-1.0 + 2.0 * h)]);
    }

    #[test]
    fn updates_change_generation() {
        let mut network = Network::random(shape(), &mut StdRng::seed_from_u64(2));
        let before = network.generation;
        network.apply_gradients(&Gradients::zeros(shape()), 0.1).unwrap();
        assert_ne!(network.generation, before);
        assert_ne!(network.clone().generation, network.generation);
    }

    #[test]
    fn shortened_gradient_arrays_leave_parameters_untouched() {
        let mut network = Network::random(shape(), &mut StdRng::seed_from_u64(4));
        let before = network.hidden_weights().to_vec();
        let mut grads = Gradients::zeros(shape());
        grads.hidden_weights = vec![1.0; 2];
        assert!(matches!(
            network.apply_gradients(&grads, 1.0),
            Err(NetworkError::ShapeMismatch { actual: 2, .. })
        ));
        assert_eq!(network.hidden_weights(), &before[..]);
    }
}
