pub mod accuracy;
pub mod accuracy_log;
pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use accuracy::accuracy;
pub use accuracy_log::AccuracyLog;
pub use epoch_stats::{EpochStats, TrainingReport};
pub use loop_fn::train_loop;
pub use train_config::TrainConfig;
pub use trainer::{EpochSummary, Trainer};
