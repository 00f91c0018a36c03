pub mod activation;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod logging;
pub mod loss;
pub mod network;
pub mod train;

// Convenience re-exports
pub use config::RunConfig;
pub use data::{Dataset, InMemoryDataset};
pub use error::NetworkError;
pub use network::{Activations, Gradients, Network, NetworkShape, ParameterExport};
pub use train::{train_loop, TrainConfig, Trainer};
