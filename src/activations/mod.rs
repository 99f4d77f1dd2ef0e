//! # Activation Functions Module
//!
//! The hidden layer of a [`ValueNetwork`](crate::network::ValueNetwork) applies a
//! scalar activation element-wise after its affine transform.
//!
//! ## Available Activations
//!
//! - **ReLU** (Rectified Linear Unit): `max(0, x)` - The default
//! - **Sigmoid**: `1 / (1 + e^(-x))` - Outputs between 0 and 1
//! - **Tanh**: Hyperbolic tangent - Outputs between -1 and 1
//! - **Custom**: Any differentiable-almost-everywhere `fn(f32) -> f32`
//!
//! The three built-in functions carry analytic derivatives. A `Custom` function
//! is differentiated with a symmetric finite difference of step
//! [`FINITE_DIFFERENCE_STEP`], so any scalar function can be plugged in.
//!
//! ## Usage Example
//!
//! ```rust
//! use bellman::activations::Activation;
//! use ndarray::array;
//!
//! let relu = Activation::Relu;
//! let mut data = array![1.0, -0.5, 0.0, 2.0];
//! relu.apply(&mut data);
//! assert_eq!(data, array![1.0, 0.0, 0.0, 2.0]);
//!
//! fn softsign(x: f32) -> f32 { x / (1.0 + x.abs()) }
//! let custom = Activation::Custom(softsign);
//! assert!((custom.derivative_at(0.0) - 1.0).abs() < 1e-2);
//! ```

pub mod functions;

pub use functions::{Activation, FINITE_DIFFERENCE_STEP};
