use std::sync::Arc;

use ferrite_digits::{Network, NetworkError, ParameterExport};

/// Read-only state shared by every request thread.
pub struct StudioState {
    pub export: ParameterExport,
    pub network: Network,
    /// Uploaded images are resized to `side × side` pixels.
    pub side: u32,
}

pub type SharedState = Arc<StudioState>;

impl StudioState {
    /// The input layer must be a perfect square so images can be mapped onto it.
    pub fn new(export: ParameterExport) -> Result<StudioState, NetworkError> {
        let network = export.clone().into_network()?;
        let inputs = network.shape().inputs;
        let side = square_side(inputs).ok_or_else(|| {
            NetworkError::Config(format!("{} inputs is not a square image size", inputs))
        })?;
        Ok(StudioState { export, network, side })
    }
}

fn square_side(n: usize) -> Option<u32> {
    let side = (n as f64).sqrt().round() as usize;
    (side * side == n).then_some(side as u32)
}
