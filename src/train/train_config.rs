use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::error::NetworkError;
use crate::train::epoch_stats::EpochStats;
use crate::train::trainer::validate_hyperparameters;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`         : full passes over the training data
/// - `mini_batch_size`: samples per parameter update; `1` is online SGD
/// - `learning_rate`  : step size applied to the averaged batch gradient
/// - `report_accuracy`: measure training/test accuracy before the first
///                      epoch and after every epoch (the final
///                      measurement is always taken)
/// - `progress_tx`    : optional channel; one `EpochStats` per completed
///                      epoch. A dropped receiver ends training.
/// - `stop_flag`      : optional atomic flag; when set the loop stops at
///                      the next mini-batch boundary.
pub struct TrainConfig {
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f32,
    pub report_accuracy: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with per-epoch reporting, no progress channel
    /// and no stop flag.
    pub fn new(epochs: usize, mini_batch_size: usize, learning_rate: f32) -> Self {
        TrainConfig {
            epochs,
            mini_batch_size,
            learning_rate,
            report_accuracy: true,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        validate_hyperparameters(self.mini_batch_size, self.learning_rate)
    }
}
