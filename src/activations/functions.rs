use ndarray::Array1;
use serde::{Serialize, Deserialize};

/// Absolute step of the symmetric finite difference used for `Custom` activations.
pub const FINITE_DIFFERENCE_STEP: f32 = 1e-4;

/// The scalar activation applied after the first affine layer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Sigmoid,
    Tanh,
    /// A caller-supplied scalar function. Not serializable.
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Activation {
    /// Evaluate the activation at a single point.
    #[inline]
    pub fn value(&self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Custom(f) => f(x),
        }
    }

    /// Derivative at a single pre-activation value.
    ///
    /// Analytic for the built-in functions; ReLU uses 0 at the kink.
    pub fn derivative_at(&self, x: f32) -> f32 {
        match self {
            Activation::Relu => {
                if x > 0.0 { 1.0 } else { 0.0 }
            }
            Activation::Sigmoid => {
                let sigmoid = 1.0 / (1.0 + (-x).exp());
                sigmoid * (1.0 - sigmoid)
            }
            Activation::Tanh => {
                let tanh_x = x.tanh();
                1.0 - tanh_x * tanh_x
            }
            Activation::Custom(_) => self.numeric_derivative(x),
        }
    }

    /// Symmetric finite-difference estimate of the derivative, available for every variant.
    pub fn numeric_derivative(&self, x: f32) -> f32 {
        let h = FINITE_DIFFERENCE_STEP;
        (self.value(x + h) - self.value(x - h)) / (2.0 * h)
    }

    /// Apply the activation function to an input array in-place.
    pub fn apply(&self, input: &mut Array1<f32>) {
        input.mapv_inplace(|v| self.value(v));
    }

    /// Compute the derivative of the activation function for an array of pre-activations.
    pub fn derivative(&self, input: &Array1<f32>) -> Array1<f32> {
        input.mapv(|v| self.derivative_at(v))
    }

    /// Whether this activation can be written to a snapshot or config file.
    pub fn is_serializable(&self) -> bool {
        !matches!(self, Activation::Custom(_))
    }
}
