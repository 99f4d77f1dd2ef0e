use ndarray::Array1;

/// Result of advancing an environment by one action.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// A sequential decision problem with fixed-length numeric states and discrete actions.
pub trait Environment {
    /// Start a new episode and return its first state.
    fn reset(&mut self) -> Array1<f32>;

    /// Apply `action` and observe the outcome.
    fn step(&mut self, action: usize) -> StepOutcome;

    /// Number of actions; valid actions are `0..num_actions()`.
    fn num_actions(&self) -> usize;
}
