use crate::data::dataset::Dataset;
use crate::error::NetworkError;
use crate::network::Network;

/// Fraction of samples whose predicted label equals the true label.
///
/// Read-only; an empty dataset scores `0.0`.
pub fn accuracy<D: Dataset + ?Sized>(network: &Network, dataset: &D) -> Result<f64, NetworkError> {
    let n = dataset.sample_count();
    if n == 0 {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for index in 0..n {
        let sample = dataset.sample(index)?;
        if network.predict(sample.pixels)? == sample.label {
            correct += 1;
        }
    }
    Ok(correct as f64 / n as f64)
}
