use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::network::NetworkShape;
use crate::train::trainer::validate_hyperparameters;
use crate::train::TrainConfig;

/// Everything a training run needs, loadable from JSON.
///
/// Missing fields take their defaults, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory holding the four MNIST IDX files.
    pub data_dir: PathBuf,
    /// Expected input width. `None` takes the width from the training data.
    pub input_neurons: Option<usize>,
    pub hidden_neurons: usize,
    pub output_neurons: usize,
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f32,
    /// Seeds both initialization and shuffling. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Measure accuracy on both splits before training and after every epoch.
    pub report_accuracy: bool,
    pub accuracy_log: Option<PathBuf>,
    pub weights_out: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data_dir: PathBuf::from("."),
            input_neurons: None,
            hidden_neurons: 30,
            output_neurons: 10,
            epochs: 30,
            mini_batch_size: 10,
            learning_rate: 3.0,
            seed: None,
            report_accuracy: true,
            accuracy_log: Some(PathBuf::from("Error.csv")),
            weights_out: PathBuf::from("WeightsBiasesJSON.txt"),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub hidden_neurons: Option<usize>,
    pub epochs: Option<usize>,
    pub mini_batch_size: Option<usize>,
    pub learning_rate: Option<f32>,
    pub seed: Option<u64>,
    pub weights_out: Option<PathBuf>,
    pub accuracy_log: Option<PathBuf>,
    pub no_report: bool,
}

impl RunConfig {
    /// Deserializes a config from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Replaces every field the overrides set.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.data_dir {
            self.data_dir = dir;
        }
        if let Some(hidden) = overrides.hidden_neurons {
            self.hidden_neurons = hidden;
        }
        if let Some(epochs) = overrides.epochs {
            self.epochs = epochs;
        }
        if let Some(size) = overrides.mini_batch_size {
            self.mini_batch_size = size;
        }
        if let Some(lr) = overrides.learning_rate {
            self.learning_rate = lr;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(path) = overrides.weights_out {
            self.weights_out = path;
        }
        if overrides.accuracy_log.is_some() {
            self.accuracy_log = overrides.accuracy_log;
        }
        if overrides.no_report {
            self.report_accuracy = false;
        }
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.hidden_neurons == 0 || self.output_neurons == 0 {
            return Err(NetworkError::config("hidden and output layers need at least one neuron"));
        }
        if self.input_neurons == Some(0) {
            return Err(NetworkError::config("input_neurons must be at least 1"));
        }
        validate_hyperparameters(self.mini_batch_size, self.learning_rate)
    }

    /// Network shape for data whose samples are `data_inputs` wide.
    pub fn shape_for(&self, data_inputs: usize) -> Result<NetworkShape, NetworkError> {
        if let Some(configured) = self.input_neurons {
            if configured != data_inputs {
                return Err(NetworkError::config(format!(
                    "input_neurons is {} but the data has {} values per sample",
                    configured, data_inputs
                )));
            }
        }
        NetworkShape::new(data_inputs, self.hidden_neurons, self.output_neurons)
    }

    pub fn train_config(&self) -> TrainConfig {
        let mut config = TrainConfig::new(self.epochs, self.mini_batch_size, self.learning_rate);
        config.report_accuracy = self.report_accuracy;
        config
    }
}
