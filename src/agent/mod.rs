//! # Deep Q-Learning Agent Module
//!
//! [`DqnAgent`] ties a [`ValueNetwork`](crate::network::ValueNetwork) to the
//! Bellman equation. It picks actions epsilon-greedily and learns from one
//! transition at a time.
//!
//! ## Core Concepts
//!
//! - **Q-Learning**: Learning the value of state-action pairs
//! - **Bellman target**: `reward + gamma * max_a' Q(next_state, a')`, or just
//!   `reward` when the transition is terminal
//! - **Exploration vs Exploitation**: With probability `epsilon` a random action is
//!   taken, otherwise the action with the highest Q-value
//!
//! ## Example Usage
//!
//! ```rust
//! use bellman::agent::DqnAgentBuilder;
//! use ndarray::array;
//!
//! let mut agent = DqnAgentBuilder::new()
//!     .layer_sizes(4, 10, 2)
//!     .gamma(0.9)
//!     .epsilon(0.1)
//!     .learning_rate(0.001)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let state = array![1.0, 2.0, 3.0, 4.0];
//! let next_state = array![2.0, 3.0, 4.0, 5.0];
//! let action = agent.select_action(state.view(), 2).unwrap();
//! agent.train(state.view(), next_state.view(), action, 1.0, false).unwrap();
//! ```
//!
//! The agent also owns an [`ExperienceStore`](crate::replay_buffer::ExperienceStore)
//! that callers can fill with [`DqnAgent::remember`]. The single-step
//! [`DqnAgent::train`] never reads from it.

mod dqn;
pub use dqn::{DqnAgent, DqnAgentBuilder};
pub(crate) use dqn::clamp_unit;
