use ndarray::{s, Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activations::Activation;
use crate::config::DqnConfig;
use crate::error::{DqnError, Result};
use crate::loss;
use crate::network::ValueNetwork;
use crate::replay_buffer::{ExperienceStore, Transition};
use crate::utils::{argmax, max_value};

/// Deep Q-Network agent trained one transition at a time.
///
/// # Example
///
/// ```rust
/// use bellman::agent::DqnAgent;
/// use bellman::config::DqnConfig;
/// use ndarray::array;
///
/// let config = DqnConfig { seed: Some(3), ..DqnConfig::default() };
/// let mut agent = DqnAgent::new(config).unwrap();
///
/// let state = array![0.25, 0.5, 0.75, 1.0];
/// let next_state = array![0.4, 0.6, 0.8, 1.0];
///
/// // Terminal transition: the acted-on target is exactly the reward
/// let target = agent.bellman_target(next_state.view(), 0, 1.0, true).unwrap();
/// assert_eq!(target[0], 1.0);
///
/// let loss = agent.train(state.view(), next_state.view(), 0, 1.0, true).unwrap();
/// assert!(loss >= 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct DqnAgent {
    q_network: ValueNetwork,
    memory: ExperienceStore,
    gamma: f32,
    epsilon: f32,
    learning_rate: f32,
    rng: StdRng,
}

impl DqnAgent {
    /// Create an agent with a freshly initialized network.
    pub fn new(config: DqnConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let q_network = ValueNetwork::new(
            config.input_size,
            config.hidden_size,
            config.output_size,
            config.activation,
            &mut rng,
        )?;
        Self::assemble(q_network, &config, rng)
    }

    /// Create an agent around an existing network.
    ///
    /// The network's layer sizes replace those in `config`.
    pub fn with_network(q_network: ValueNetwork, config: DqnConfig) -> Result<Self> {
        let config = DqnConfig {
            input_size: q_network.input_size(),
            hidden_size: q_network.hidden_size(),
            output_size: q_network.output_size(),
            activation: q_network.activation(),
            ..config
        };
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Self::assemble(q_network, &config, rng)
    }

    fn assemble(q_network: ValueNetwork, config: &DqnConfig, rng: StdRng) -> Result<Self> {
        Ok(DqnAgent {
            q_network,
            memory: ExperienceStore::new(config.buffer_capacity)?,
            gamma: config.gamma,
            epsilon: config.epsilon,
            learning_rate: config.learning_rate,
            rng,
        })
    }

    pub fn q_network(&self) -> &ValueNetwork {
        &self.q_network
    }

    pub(crate) fn q_network_mut(&mut self) -> &mut ValueNetwork {
        &mut self.q_network
    }

    pub fn memory(&self) -> &ExperienceStore {
        &self.memory
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Set the discount factor, clamped into `[0, 1]`. NaN is rejected.
    pub fn set_gamma(&mut self, gamma: f32) -> Result<()> {
        self.gamma = clamp_unit("gamma", gamma)?;
        Ok(())
    }

    /// Set the exploration rate, clamped into `[0, 1]`. NaN is rejected.
    pub fn set_epsilon(&mut self, epsilon: f32) -> Result<()> {
        self.epsilon = clamp_unit("epsilon", epsilon)?;
        Ok(())
    }

    pub fn set_learning_rate(&mut self, learning_rate: f32) -> Result<()> {
        if !(learning_rate.is_finite() && learning_rate >= 0.0) {
            return Err(DqnError::invalid_parameter(
                "learning_rate".to_string(),
                format!("must be a non-negative finite number, got {}", learning_rate),
            ));
        }
        self.learning_rate = learning_rate;
        Ok(())
    }

    /// Q-values of every action in `state`.
    pub fn q_values(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.q_network.predict(state)
    }

    /// Epsilon-greedy action in `[0, num_actions)`.
    ///
    /// Exploration draws a uniform index without evaluating the network. The
    /// greedy choice is the first strict maximum among the first `num_actions`
    /// Q-values.
    pub fn select_action(&mut self, state: ArrayView1<f32>, num_actions: usize) -> Result<usize> {
        let output_size = self.q_network.output_size();
        if num_actions == 0 || num_actions > output_size {
            return Err(DqnError::invalid_parameter(
                "num_actions".to_string(),
                format!("must be in [1, {}], got {}", output_size, num_actions),
            ));
        }

        if self.rng.gen::<f32>() < self.epsilon {
            return Ok(self.rng.gen_range(0..num_actions));
        }

        let q_values = self.q_network.predict(state)?;
        argmax(q_values.slice(s![..num_actions]))
            .ok_or_else(|| DqnError::invalid_parameter("num_actions", "no Q-values to choose from"))
    }

    /// Target vector for one transition.
    ///
    /// Starts from the Q-values of `next_state` and overwrites the `action`
    /// component with `reward` (terminal) or `reward + gamma * max Q(next_state)`.
    pub fn bellman_target(
        &self,
        next_state: ArrayView1<f32>,
        action: usize,
        reward: f32,
        done: bool,
    ) -> Result<Array1<f32>> {
        let output_size = self.q_network.output_size();
        if action >= output_size {
            return Err(DqnError::IndexOutOfRange {
                index: action,
                len: output_size,
            });
        }

        let next_q_values = self.q_network.predict(next_state)?;
        let max_next_q = max_value(next_q_values.view()).unwrap_or(0.0);

        let mut target = next_q_values;
        target[action] = if done {
            reward
        } else {
            reward + self.gamma * max_next_q
        };
        Ok(target)
    }

    /// Single-transition Bellman update.
    ///
    /// Returns the squared error between the current Q-values and the target,
    /// measured before the update. The experience store is not consulted.
    pub fn train(
        &mut self,
        state: ArrayView1<f32>,
        next_state: ArrayView1<f32>,
        action: usize,
        reward: f32,
        done: bool,
    ) -> Result<f32> {
        let target = self.bellman_target(next_state, action, reward, done)?;
        let current_q_values = self.q_network.predict(state)?;
        let loss = loss::mean_squared_error(current_q_values.view(), target.view())?;

        self.q_network.backward_update(
            state,
            current_q_values.view(),
            target.view(),
            self.learning_rate,
        )?;
        Ok(loss)
    }

    pub fn train_transition(&mut self, transition: &Transition) -> Result<f32> {
        self.train(
            transition.state.view(),
            transition.next_state.view(),
            transition.action,
            transition.reward,
            transition.done,
        )
    }

    /// Store a transition in the agent's experience store.
    pub fn remember(&mut self, transition: Transition) {
        self.memory.insert(transition);
    }

    /// Sample from the agent's experience store using the agent's random source.
    pub fn sample_memory(&mut self, batch_size: usize) -> Result<Vec<Transition>> {
        let samples = self.memory.sample(batch_size, &mut self.rng)?;
        Ok(samples.into_iter().cloned().collect())
    }
}

/// `value` clamped into `[0, 1]`; NaN has no place in that range.
pub(crate) fn clamp_unit(name: &str, value: f32) -> Result<f32> {
    if value.is_nan() {
        return Err(DqnError::invalid_parameter(
            name.to_string(),
            "must be in [0, 1], got NaN".to_string(),
        ));
    }
    Ok(value.clamp(0.0, 1.0))
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Builder pattern for DqnAgent
pub struct DqnAgentBuilder {
    config: DqnConfig,
}

impl DqnAgentBuilder {
    pub fn new() -> Self {
        DqnAgentBuilder {
            config: DqnConfig::default(),
        }
    }

    pub fn from_config(config: DqnConfig) -> Self {
        DqnAgentBuilder { config }
    }

    pub fn layer_sizes(mut self, input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        self.config.input_size = input_size;
        self.config.hidden_size = hidden_size;
        self.config.output_size = output_size;
        self
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.config.activation = activation;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DqnAgent> {
        DqnAgent::new(self.config)
    }
}

impl Default for DqnAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
