/// Quadratic cost against a one-hot target: `C = 0.5 * Σ (o_k - t_k)^2`.
pub struct QuadraticCost;

impl QuadraticCost {
    /// One-hot target value for output neuron `index` when the true class is `label`.
    #[inline]
    pub fn target(index: usize, label: usize) -> f32 {
        if index == label { 1.0 } else { 0.0 }
    }

    /// Scalar cost for one sample, accumulated in `f64`.
    pub fn cost(outputs: &[f32], label: usize) -> f64 {
        outputs.iter().enumerate()
            .map(|(k, &o)| {
                let diff = (o - Self::target(k, label)) as f64;
                diff * diff
            })
            .sum::<f64>() * 0.5
    }

    /// ∂C/∂o_k = o_k - t_k
    #[inline]
    pub fn derivative(output: f32, index: usize, label: usize) -> f32 {
        output - Self::target(index, label)
    }
}
