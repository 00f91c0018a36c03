use thiserror::Error;

/// Failures raised by the network core and the training loop.
///
/// All of these are programmer or configuration errors: they are reported to
/// the immediate caller and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    /// An input vector or parameter array has the wrong length.
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Invalid hyperparameter, topology or run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A forward or backward pass was requested before `Network::initialize`.
    #[error("network parameters have not been initialized")]
    UninitializedParameters,

    /// The activations handed to the backward pass do not belong to the
    /// network's current parameters.
    #[error("backward pass does not match the last forward pass: {0}")]
    SequencingViolation(&'static str),

    #[error("label {label} is out of range for {outputs} output neurons")]
    LabelOutOfRange { label: usize, outputs: usize },

    #[error("sample index {index} is out of range for a dataset of {len} samples")]
    SampleOutOfRange { index: usize, len: usize },
}

impl NetworkError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        NetworkError::Config(msg.into())
    }
}
