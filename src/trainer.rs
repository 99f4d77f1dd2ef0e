//! Episode driver connecting an [`Environment`] to a [`DqnAgent`].

use ndarray::Array1;
use serde::{Serialize, Deserialize};

use crate::agent::DqnAgent;
use crate::environment::Environment;
use crate::error::{DqnError, Result};
use crate::replay_buffer::Transition;
use crate::utils::normalize;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerOptions {
    pub episodes: usize,
    /// Episodes are cut off after this many steps even if the environment never terminates
    pub max_steps_per_episode: usize,
    /// Rescale states by their largest component before they reach the agent
    pub normalize_states: bool,
    /// Also insert every transition into the agent's experience store
    pub remember_transitions: bool,
    /// Log progress every this many episodes; 0 disables progress logging
    pub log_every: usize,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        TrainerOptions {
            episodes: 100,
            max_steps_per_episode: 200,
            normalize_states: false,
            remember_transitions: true,
            log_every: 100,
        }
    }
}

/// Summary of one episode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub total_reward: f32,
    pub steps: usize,
    /// Mean pre-update loss over the transitions that were trained on
    pub mean_loss: f32,
    /// Transitions whose update failed and were skipped
    pub skipped: usize,
}

pub struct Trainer {
    options: TrainerOptions,
}

impl Trainer {
    pub fn new(options: TrainerOptions) -> Result<Self> {
        if options.max_steps_per_episode == 0 {
            return Err(DqnError::invalid_parameter(
                "max_steps_per_episode",
                "must be greater than 0",
            ));
        }
        Ok(Trainer { options })
    }

    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    /// Play one episode, training on every transition as it happens.
    ///
    /// A transition whose training update fails is skipped and the episode
    /// continues. Failing to select an action ends the episode with an error.
    pub fn run_episode<E: Environment>(&self, agent: &mut DqnAgent, env: &mut E) -> Result<EpisodeStats> {
        let num_actions = env.num_actions();
        let mut state = self.prepare(env.reset());
        let mut stats = EpisodeStats::default();
        let mut loss_sum = 0.0;
        let mut trained = 0usize;

        while stats.steps < self.options.max_steps_per_episode {
            let action = agent.select_action(state.view(), num_actions)?;
            let outcome = env.step(action);
            let next_state = self.prepare(outcome.next_state);
            stats.total_reward += outcome.reward;
            stats.steps += 1;

            match agent.train(state.view(), next_state.view(), action, outcome.reward, outcome.done) {
                Ok(loss) => {
                    loss_sum += loss;
                    trained += 1;
                }
                Err(err) => {
                    log::warn!("Skipping transition at step {}: {}", stats.steps, err);
                    stats.skipped += 1;
                }
            }

            if self.options.remember_transitions {
                agent.remember(Transition::new(
                    state.clone(),
                    action,
                    outcome.reward,
                    next_state.clone(),
                    outcome.done,
                ));
            }

            state = next_state;
            if outcome.done {
                break;
            }
        }

        if trained > 0 {
            stats.mean_loss = loss_sum / trained as f32;
        }
        Ok(stats)
    }

    /// Play `options.episodes` episodes and collect their statistics.
    pub fn run<E: Environment>(&self, agent: &mut DqnAgent, env: &mut E) -> Result<Vec<EpisodeStats>> {
        let mut history = Vec::with_capacity(self.options.episodes);
        for episode in 0..self.options.episodes {
            if self.options.log_every > 0 && episode % self.options.log_every == 0 {
                log::info!("Running episode {}/{}", episode, self.options.episodes);
            }
            let stats = self.run_episode(agent, env)?;
            log::debug!(
                "Episode {} finished: reward {:.3}, {} steps, mean loss {:.5}, {} skipped",
                episode, stats.total_reward, stats.steps, stats.mean_loss, stats.skipped
            );
            history.push(stats);
        }
        Ok(history)
    }

    fn prepare(&self, state: Array1<f32>) -> Array1<f32> {
        if self.options.normalize_states {
            normalize(state.view())
        } else {
            state
        }
    }
}
