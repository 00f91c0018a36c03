/// Logistic sigmoid, `1 / (1 + e^-x)`.
///
/// Saturates to exactly `0.0` / `1.0` in `f32` once `|x|` is large enough
/// (roughly `x < -88` or `x > 17`).
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed through its own output:
/// `σ'(z) = σ(z) * (1 - σ(z))`.
///
/// Both layers cache `σ(z)` rather than `z`, so this is the form the
/// backward pass uses.
pub fn sigmoid_derivative_from_output(output: f32) -> f32 {
    output * (1.0 - output)
}
