//! # Bellman - A Minimal Deep Q-Learning Core
//!
//! Bellman is a small Deep Q-Learning (DQN) library: a single-hidden-layer
//! state-action value network with hand-written backpropagation, a bounded
//! memory of past transitions, and an agent that trains the network toward
//! Bellman targets one transition at a time.
//!
//! ## Key Features
//!
//! - **Value network**: `input -> hidden -> output` feedforward network with
//!   Xavier-uniform initialization and plain gradient descent
//! - **Pluggable activation**: ReLU, Sigmoid, Tanh, or any scalar `fn(f32) -> f32`
//! - **Experience store**: fixed-capacity FIFO buffer with uniform sampling
//! - **Epsilon-greedy agent**: reproducible through an explicit seed
//! - **Persistence**: compact bincode snapshots of weights and hyperparameters
//!
//! ## Quick Start
//!
//! ```rust
//! use bellman::agent::DqnAgentBuilder;
//! use bellman::utils::normalize;
//! use ndarray::array;
//!
//! let mut agent = DqnAgentBuilder::new()
//!     .layer_sizes(4, 10, 2)
//!     .gamma(0.9)
//!     .epsilon(0.1)
//!     .learning_rate(0.001)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! let state = normalize(array![1.0, 2.0, 3.0, 4.0].view());
//! let action = agent.select_action(state.view(), 2).unwrap();
//!
//! // After stepping the environment...
//! let next_state = normalize(array![2.0, 3.0, 4.0, 5.0].view());
//! agent.train(state.view(), next_state.view(), action, 1.0, false).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions and their derivatives
//! - [`agent`] - The DQN agent and its builder
//! - [`config`] - Serializable agent configuration
//! - [`environment`] - The environment contract driven by the trainer
//! - [`error`] - Error types and result handling
//! - [`initialization`] - Weight initialization strategies
//! - [`loss`] - Mean squared error
//! - [`network`] - The value network
//! - [`persistence`] - Saving and loading agents
//! - [`replay_buffer`] - Transitions and the experience store
//! - [`trainer`] - Episode loop
//! - [`utils`] - State normalization and argmax helpers

pub mod activations;
pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod initialization;
pub mod loss;
pub mod network;
pub mod persistence;
pub mod replay_buffer;
pub mod trainer;
pub mod utils;

pub use error::{DqnError, Result};

#[cfg(test)]
mod tests;
