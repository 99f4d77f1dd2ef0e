use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::initialization::WeightInit;
use crate::loss;

/// The raw parameter block of a [`ValueNetwork`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    /// `hidden x input`
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    /// `output x hidden`
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
}

/// Gradients of the squared error with respect to every parameter tensor.
///
/// Same shapes as the corresponding [`NetworkParameters`] fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
}

impl Gradients {
    /// Whether every entry of every tensor is finite.
    pub fn is_finite(&self) -> bool {
        self.w1.iter()
            .chain(self.b1.iter())
            .chain(self.w2.iter())
            .chain(self.b2.iter())
            .all(|g| g.is_finite())
    }
}

/// Intermediate values of a forward pass that the backward pass needs.
struct ForwardPass {
    pre_activation: Array1<f32>,
    hidden: Array1<f32>,
    output: Array1<f32>,
}

/// A feedforward state-action value approximator with one hidden layer.
///
/// Computes `out = W2 · activation(W1 · state + b1) + b2`. The layer sizes are
/// fixed at construction and the parameters are updated in place by
/// [`backward_update`](ValueNetwork::backward_update).
///
/// # Example
///
/// ```rust
/// use bellman::network::ValueNetwork;
/// use bellman::activations::Activation;
/// use ndarray::array;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut network = ValueNetwork::new(4, 10, 2, Activation::Relu, &mut rng).unwrap();
///
/// let state = array![1.0, 2.0, 3.0, 4.0];
/// let q_values = network.predict(state.view()).unwrap();
/// assert_eq!(q_values.len(), 2);
///
/// let mut target = q_values.clone();
/// target[1] = 1.0;
/// network.backward_update(state.view(), q_values.view(), target.view(), 0.001).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ValueNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    w1: Array2<f32>,
    b1: Array1<f32>,
    w2: Array2<f32>,
    b2: Array1<f32>,
    activation: Activation,
}

impl ValueNetwork {
    /// Create a network with Xavier-uniform weights and biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        Self::with_init(input_size, hidden_size, output_size, activation, WeightInit::XavierUniform, rng)
    }

    /// Create a network using the given initialization strategy for both layers.
    pub fn with_init<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        for (name, size) in [
            ("input_size", input_size),
            ("hidden_size", hidden_size),
            ("output_size", output_size),
        ] {
            if size == 0 {
                return Err(DqnError::invalid_parameter(name, "must be greater than 0"));
            }
        }

        let w1 = init.initialize_weights(input_size, hidden_size, rng)?;
        let b1 = init.initialize_biases(input_size, hidden_size, rng)?;
        let w2 = init.initialize_weights(hidden_size, output_size, rng)?;
        let b2 = init.initialize_biases(hidden_size, output_size, rng)?;

        Ok(ValueNetwork {
            input_size,
            hidden_size,
            output_size,
            w1,
            b1,
            w2,
            b2,
            activation,
        })
    }

    /// Build a network around an existing parameter block.
    ///
    /// Layer sizes are inferred from `w1` and `w2`; every other tensor must agree with them.
    pub fn from_parameters(parameters: NetworkParameters, activation: Activation) -> Result<Self> {
        let (hidden_size, input_size) = parameters.w1.dim();
        let (output_size, _) = parameters.w2.dim();
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(DqnError::invalid_parameter(
                "parameters",
                "layer sizes must be greater than 0",
            ));
        }
        let mut network = ValueNetwork {
            input_size,
            hidden_size,
            output_size,
            w1: Array2::zeros((hidden_size, input_size)),
            b1: Array1::zeros(hidden_size),
            w2: Array2::zeros((output_size, hidden_size)),
            b2: Array1::zeros(output_size),
            activation,
        };
        network.set_parameters(parameters)?;
        Ok(network)
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn w1(&self) -> &Array2<f32> {
        &self.w1
    }

    pub fn b1(&self) -> &Array1<f32> {
        &self.b1
    }

    pub fn w2(&self) -> &Array2<f32> {
        &self.w2
    }

    pub fn b2(&self) -> &Array1<f32> {
        &self.b2
    }

    /// Copy out the current parameter block.
    pub fn parameters(&self) -> NetworkParameters {
        NetworkParameters {
            w1: self.w1.clone(),
            b1: self.b1.clone(),
            w2: self.w2.clone(),
            b2: self.b2.clone(),
        }
    }

    /// Replace the parameter block. Every tensor must match the current layer sizes.
    pub fn set_parameters(&mut self, parameters: NetworkParameters) -> Result<()> {
        let expected = [
            ("w1", (self.hidden_size, self.input_size), parameters.w1.dim()),
            ("b1", (self.hidden_size, 1), (parameters.b1.len(), 1)),
            ("w2", (self.output_size, self.hidden_size), parameters.w2.dim()),
            ("b2", (self.output_size, 1), (parameters.b2.len(), 1)),
        ];
        for (name, want, got) in expected {
            if want != got {
                return Err(DqnError::dimension_mismatch(
                    format!("{} of shape {:?}", name, want),
                    format!("shape {:?}", got),
                ));
            }
        }

        self.w1 = parameters.w1;
        self.b1 = parameters.b1;
        self.w2 = parameters.w2;
        self.b2 = parameters.b2;
        Ok(())
    }

    fn forward(&self, state: ArrayView1<f32>) -> Result<ForwardPass> {
        DqnError::check_len("state", self.input_size, state.len())?;

        let pre_activation = self.w1.dot(&state) + &self.b1;
        let mut hidden = pre_activation.clone();
        self.activation.apply(&mut hidden);
        let output = self.w2.dot(&hidden) + &self.b2;

        Ok(ForwardPass { pre_activation, hidden, output })
    }

    /// Q-values for every action in `state`.
    ///
    /// No normalization or clamping is applied; callers wanting bounded inputs
    /// normalize beforehand.
    pub fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        Ok(self.forward(state)?.output)
    }

    /// Mean squared error between `predictions` and `targets`.
    pub fn loss(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<f32> {
        loss::mean_squared_error(predictions, targets)
    }

    /// Compute the gradients for one sample without touching the parameters.
    ///
    /// `predicted` is the already-evaluated network output the error is taken
    /// against; it is not recomputed. The forward pass is rerun only to recover
    /// the hidden layer.
    pub fn gradients(
        &self,
        state: ArrayView1<f32>,
        predicted: ArrayView1<f32>,
        target: ArrayView1<f32>,
    ) -> Result<Gradients> {
        DqnError::check_len("prediction", self.output_size, predicted.len())?;
        DqnError::check_len("target", self.output_size, target.len())?;
        let pass = self.forward(state)?;

        let delta_out = loss::output_error(predicted, target)?;
        let w2 = outer(&delta_out, &pass.hidden);

        let delta_hidden = self.w2.t().dot(&delta_out) * &self.activation.derivative(&pass.pre_activation);
        let w1 = outer(&delta_hidden, &state.to_owned());

        Ok(Gradients {
            w1,
            b1: delta_hidden,
            w2,
            b2: delta_out,
        })
    }

    /// Take one gradient-descent step: `p <- p - learning_rate * grad`.
    ///
    /// Non-finite gradients are applied as-is.
    pub fn apply_gradients(&mut self, gradients: &Gradients, learning_rate: f32) -> Result<()> {
        let shapes_match = gradients.w1.dim() == self.w1.dim()
            && gradients.b1.len() == self.b1.len()
            && gradients.w2.dim() == self.w2.dim()
            && gradients.b2.len() == self.b2.len();
        if !shapes_match {
            return Err(DqnError::dimension_mismatch(
                "gradients shaped like the network parameters",
                "gradients of another shape",
            ));
        }

        self.w2.scaled_add(-learning_rate, &gradients.w2);
        self.b2.scaled_add(-learning_rate, &gradients.b2);
        self.w1.scaled_add(-learning_rate, &gradients.w1);
        self.b1.scaled_add(-learning_rate, &gradients.b1);
        Ok(())
    }

    /// Backpropagate `predicted - target` for `state` and update all four parameter tensors.
    ///
    /// Either every tensor is updated or the call fails before anything is mutated.
    /// A learning rate of zero leaves the network untouched.
    pub fn backward_update(
        &mut self,
        state: ArrayView1<f32>,
        predicted: ArrayView1<f32>,
        target: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<()> {
        let gradients = self.gradients(state, predicted, target)?;
        if learning_rate == 0.0 {
            return Ok(());
        }
        self.apply_gradients(&gradients, learning_rate)
    }
}

/// `a ⊗ b`, a `a.len() x b.len()` matrix.
fn outer(a: &Array1<f32>, b: &Array1<f32>) -> Array2<f32> {
    let column = a.view().insert_axis(Axis(1));
    let row = b.view().insert_axis(Axis(0));
    column.dot(&row)
}
