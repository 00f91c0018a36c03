use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::network::network::Network;
use crate::network::shape::NetworkShape;

/// Trained parameters in the JSON layout read by the inference demo.
///
/// Arrays are flattened with the network's own index convention: the weight
/// from source `i` into neuron `j` is element `j * <source count> + i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterExport {
    pub input_neurons: usize,
    pub hidden_neurons: usize,
    pub output_neurons: usize,
    pub hidden_biases: Vec<f32>,
    pub hidden_weights: Vec<f32>,
    pub output_biases: Vec<f32>,
    pub output_weights: Vec<f32>,
}

impl ParameterExport {
    pub fn shape(&self) -> Result<NetworkShape, NetworkError> {
        NetworkShape::new(self.input_neurons, self.hidden_neurons, self.output_neurons)
    }

    /// Rebuilds a network, checking every array against the declared shape.
    pub fn into_network(self) -> Result<Network, NetworkError> {
        let shape = self.shape()?;
        Network::from_parameters(
            shape,
            self.hidden_weights,
            self.hidden_biases,
            self.output_weights,
            self.output_biases,
        )
    }

    /// Serializes the parameters to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes parameters from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<ParameterExport> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl Network {
    /// Copies the current parameters out for serialization.
    pub fn export(&self) -> Result<ParameterExport, NetworkError> {
        self.ensure_initialized()?;
        Ok(ParameterExport {
            input_neurons: self.shape.inputs,
            hidden_neurons: self.shape.hidden,
            output_neurons: self.shape.outputs,
            hidden_biases: self.hidden_biases().to_vec(),
            hidden_weights: self.hidden_weights().to_vec(),
            output_biases: self.output_biases().to_vec(),
            output_weights: self.output_weights().to_vec(),
        })
    }
}
