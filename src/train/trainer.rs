use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::data::dataset::Dataset;
use crate::error::NetworkError;
use crate::network::{Gradients, Network, NetworkShape};

/// Outcome of one call to [`Trainer::train`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochSummary {
    /// Samples that contributed to a parameter update.
    pub samples: usize,
    /// Parameter updates applied (one per mini-batch).
    pub batches: usize,
    /// Mean quadratic cost over the trained samples, measured before each
    /// sample's batch update.
    pub mean_cost: f64,
    /// Fraction of trained samples that were already classified correctly
    /// when their batch was evaluated.
    pub training_accuracy: f64,
    /// True when the stop flag ended the epoch early.
    pub cancelled: bool,
}

/// Mini-batch stochastic gradient descent over a [`Dataset`].
///
/// Owns everything that persists between epochs: the shuffling RNG, the
/// sample order and the gradient buffers.
pub struct Trainer<R: Rng = StdRng> {
    rng: R,
    order: Vec<usize>,
    sample_grads: Option<Gradients>,
    batch_grads: Option<Gradients>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl Trainer<StdRng> {
    pub fn from_entropy() -> Self {
        Trainer::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Trainer::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Trainer<R> {
    pub fn new(rng: R) -> Self {
        Trainer {
            rng,
            order: Vec::new(),
            sample_grads: None,
            batch_grads: None,
            stop_flag: None,
        }
    }

    /// Checked at every mini-batch boundary; once set, the current epoch
    /// stops before its next parameter update.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn set_stop_flag(&mut self, flag: Option<Arc<AtomicBool>>) {
        self.stop_flag = flag;
    }

    /// Sample order used by the most recent epoch.
    pub fn training_order(&self) -> &[usize] {
        &self.order
    }

    /// Runs one epoch.
    ///
    /// The sample order is reshuffled once, then consumed in consecutive
    /// windows of `mini_batch_size` (the last one may be shorter). Gradients
    /// are summed over a window and applied with `learning_rate / window_len`,
    /// which is the same as averaging them first.
    pub fn train<D: Dataset + ?Sized>(
        &mut self,
        network: &mut Network,
        dataset: &D,
        mini_batch_size: usize,
        learning_rate: f32,
    ) -> Result<EpochSummary, NetworkError> {
        validate_hyperparameters(mini_batch_size, learning_rate)?;
        network.ensure_initialized()?;
        let shape = network.shape();
        if dataset.input_len() != shape.inputs {
            return Err(NetworkError::ShapeMismatch {
                expected: shape.inputs,
                actual: dataset.input_len(),
            });
        }

        let n = dataset.sample_count();
        check_samples(dataset, shape)?;
        if self.order.len() != n {
            self.order = (0..n).collect();
        }
        self.order.shuffle(&mut self.rng);

        let mut sample_grads = reuse_or_zeros(self.sample_grads.take(), shape);
        let mut batch_grads = reuse_or_zeros(self.batch_grads.take(), shape);

        let mut summary = EpochSummary::default();
        let mut total_cost = 0.0;
        let mut correct = 0usize;

        for window in self.order.chunks(mini_batch_size) {
            if self.stop_requested() {
                debug!(batches = summary.batches, "stop requested, ending epoch early");
                summary.cancelled = true;
                break;
            }

            batch_grads.clear();
            for &index in window {
                let sample = dataset.sample(index)?;
                let activations = network.forward(sample.pixels)?;
                network.backward_into(&activations, sample.label, &mut sample_grads)?;
                batch_grads.accumulate(&sample_grads)?;

                total_cost += activations.cost(sample.label);
                if activations.predicted_label() == sample.label {
                    correct += 1;
                }
            }

            let lr = effective_learning_rate(learning_rate, window.len());
            network.apply_gradients(&batch_grads, lr)?;
            trace!(batch = summary.batches, size = window.len(), lr, "applied mini-batch");

            summary.batches += 1;
            summary.samples += window.len();
        }

        if summary.samples > 0 {
            summary.mean_cost = total_cost / summary.samples as f64;
            summary.training_accuracy = correct as f64 / summary.samples as f64;
        }

        self.sample_grads = Some(sample_grads);
        self.batch_grads = Some(batch_grads);
        Ok(summary)
    }

    fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// Learning rate applied to a window's summed gradients.
pub fn effective_learning_rate(learning_rate: f32, window_len: usize) -> f32 {
    learning_rate / window_len as f32
}

/// `mini_batch_size` must be at least 1 and `learning_rate` finite and positive.
pub fn validate_hyperparameters(mini_batch_size: usize, learning_rate: f32) -> Result<(), NetworkError> {
    if mini_batch_size == 0 {
        return Err(NetworkError::config("mini-batch size must be at least 1"));
    }
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(NetworkError::config(format!(
            "learning rate must be a positive number, got {}",
            learning_rate
        )));
    }
    Ok(())
}

/// Every sample must be readable, as wide as the input layer and labelled
/// within the output layer. A bad sample fails the epoch before any
/// parameter is touched.
fn check_samples<D: Dataset + ?Sized>(dataset: &D, shape: NetworkShape) -> Result<(), NetworkError> {
    for index in 0..dataset.sample_count() {
        let sample = dataset.sample(index)?;
        if sample.pixels.len() != shape.inputs {
            return Err(NetworkError::ShapeMismatch { expected: shape.inputs, actual: sample.pixels.len() });
        }
        if sample.label >= shape.outputs {
            return Err(NetworkError::LabelOutOfRange { label: sample.label, outputs: shape.outputs });
        }
    }
    Ok(())
}

fn reuse_or_zeros(buffer: Option<Gradients>, shape: NetworkShape) -> Gradients {
    match buffer {
        Some(grads) if grads.shape() == shape => grads,
        _ => Gradients::zeros(shape),
    }
}
