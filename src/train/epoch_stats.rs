use serde::{Deserialize, Serialize};

/// Per-epoch statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop
/// sends one `EpochStats` at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Parameter updates applied during this epoch.
    pub batches: usize,
    /// Mean quadratic cost over the epoch's samples.
    pub mean_cost: f64,
    /// Accuracy on the full training set after the epoch, if measured.
    pub training_accuracy: Option<f64>,
    /// Accuracy on the test set after the epoch, if measured.
    pub test_accuracy: Option<f64>,
    /// Wall-clock duration of the epoch's training pass in milliseconds.
    pub elapsed_ms: u64,
}

/// Everything `train_loop` measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: Vec<EpochStats>,
    pub final_training_accuracy: f64,
    pub final_test_accuracy: Option<f64>,
    /// True when training ended before all requested epochs ran.
    pub stopped_early: bool,
    pub elapsed_ms: u64,
}
