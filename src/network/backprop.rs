use crate::activation::sigmoid_derivative_from_output;
use crate::error::NetworkError;
use crate::loss::QuadraticCost;
use crate::network::activations::Activations;
use crate::network::gradients::Gradients;
use crate::network::network::Network;

impl Network {
    /// Gradients of the quadratic cost for one sample, computed from the
    /// activations of its forward pass.
    pub fn backward(&self, activations: &Activations<'_>, label: usize) -> Result<Gradients, NetworkError> {
        let mut grads = Gradients::zeros(self.shape);
        self.backward_into(activations, label, &mut grads)?;
        Ok(grads)
    }

    /// Same as [`Network::backward`] but overwrites a caller-owned buffer.
    ///
    /// Output layer:  δ_k = (o_k - t_k) · o_k · (1 - o_k)
    /// Hidden layer:  δ_j = (Σ_k δ_k · w_kj) · h_j · (1 - h_j)
    ///
    /// Each bias gradient is its neuron's δ; each weight gradient is the
    /// destination δ times the source activation.
    pub fn backward_into(
        &self,
        activations: &Activations<'_>,
        label: usize,
        grads: &mut Gradients,
    ) -> Result<(), NetworkError> {
        self.ensure_initialized()?;
        let shape = self.shape;
        if label >= shape.outputs {
            return Err(NetworkError::LabelOutOfRange { label, outputs: shape.outputs });
        }
        if activations.hidden.len() != shape.hidden
            || activations.output.len() != shape.outputs
            || activations.input.len() != shape.inputs
        {
            return Err(NetworkError::SequencingViolation("activations come from a network of another shape"));
        }
        if activations.generation != self.generation {
            return Err(NetworkError::SequencingViolation("parameters changed since the forward pass"));
        }
        grads.check_shape(shape)?;

        let input = activations.input;
        let hidden = &activations.hidden;
        let output = &activations.output;

        for (k, &o) in output.iter().enumerate() {
            let delta = QuadraticCost::derivative(o, k, label) * sigmoid_derivative_from_output(o);
            grads.output_biases[k] = delta;

            let row = &mut grads.output_weights[k * shape.hidden..(k + 1) * shape.hidden];
            for (g, &h) in row.iter_mut().zip(hidden.iter()) {
                *g = delta * h;
            }
        }

        for (j, &h) in hidden.iter().enumerate() {
            let upstream: f32 = grads.output_biases.iter().enumerate()
                .map(|(k, &delta_k)| delta_k * self.output.weight(j, k))
                .sum();
            let delta = upstream * sigmoid_derivative_from_output(h);
            grads.hidden_biases[j] = delta;

            let row = &mut grads.hidden_weights[j * shape.inputs..(j + 1) * shape.inputs];
            for (g, &x) in row.iter_mut().zip(input.iter()) {
                *g = delta * x;
            }
        }

        Ok(())
    }
}
