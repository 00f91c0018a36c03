pub mod activations;
pub mod backprop;
pub mod export;
pub mod gradients;
pub mod network;
pub mod shape;

pub use activations::Activations;
pub use export::ParameterExport;
pub use gradients::Gradients;
pub use network::Network;
pub use shape::NetworkShape;
