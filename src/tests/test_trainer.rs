use ndarray::{array, Array1};

use crate::agent::{DqnAgent, DqnAgentBuilder};
use crate::environment::{Environment, StepOutcome};
use crate::error::DqnError;
use crate::trainer::{Trainer, TrainerOptions};

/// Walk right along a line of `length` cells; reaching the end pays 1.
struct Corridor {
    length: usize,
    position: usize,
}

impl Corridor {
    fn new(length: usize) -> Self {
        Corridor { length, position: 0 }
    }

    fn observe(&self) -> Array1<f32> {
        array![self.position as f32, (self.length - self.position) as f32]
    }
}

impl Environment for Corridor {
    fn reset(&mut self) -> Array1<f32> {
        self.position = 0;
        self.observe()
    }

    fn step(&mut self, action: usize) -> StepOutcome {
        if action == 1 {
            self.position += 1;
        } else if self.position > 0 {
            self.position -= 1;
        }
        let done = self.position == self.length;
        StepOutcome {
            next_state: self.observe(),
            reward: if done { 1.0 } else { 0.0 },
            done,
        }
    }

    fn num_actions(&self) -> usize {
        2
    }
}

/// Emits states of the wrong length, so every training update fails.
struct Broken {
    steps: usize,
}

impl Environment for Broken {
    fn reset(&mut self) -> Array1<f32> {
        self.steps = 0;
        array![0.0, 0.0, 0.0]
    }

    fn step(&mut self, _action: usize) -> StepOutcome {
        self.steps += 1;
        StepOutcome {
            next_state: array![0.0, 0.0, 0.0],
            reward: 0.5,
            done: self.steps == 5,
        }
    }

    fn num_actions(&self) -> usize {
        2
    }
}

fn agent(epsilon: f32) -> DqnAgent {
    DqnAgentBuilder::new()
        .layer_sizes(2, 8, 2)
        .buffer_capacity(16)
        .epsilon(epsilon)
        .learning_rate(0.01)
        .seed(21)
        .build()
        .unwrap()
}

#[test]
fn test_episode_terminates_and_remembers() {
    let trainer = Trainer::new(TrainerOptions {
        max_steps_per_episode: 500,
        ..TrainerOptions::default()
    })
    .unwrap();
    let mut agent = agent(1.0);
    let mut env = Corridor::new(3);

    let stats = trainer.run_episode(&mut agent, &mut env).unwrap();
    assert!(stats.steps >= 3);
    assert_eq!(stats.skipped, 0);
    assert_eq!(agent.memory().len(), stats.steps.min(16));
    if stats.steps < 500 {
        assert_eq!(stats.total_reward, 1.0);
    }
}

#[test]
fn test_step_cap() {
    let trainer = Trainer::new(TrainerOptions {
        max_steps_per_episode: 4,
        remember_transitions: false,
        ..TrainerOptions::default()
    })
    .unwrap();
    let mut agent = agent(1.0);
    let mut env = Corridor::new(100);

    let stats = trainer.run_episode(&mut agent, &mut env).unwrap();
    assert_eq!(stats.steps, 4);
    assert_eq!(stats.total_reward, 0.0);
    assert!(agent.memory().is_empty());
}

#[test]
fn test_failed_updates_are_skipped() {
    let trainer = Trainer::new(TrainerOptions::default()).unwrap();
    // Full exploration so action selection never touches the malformed state
    let mut agent = agent(1.0);
    let before = agent.q_network().parameters();
    let mut env = Broken { steps: 0 };

    let stats = trainer.run_episode(&mut agent, &mut env).unwrap();
    assert_eq!(stats.steps, 5);
    assert_eq!(stats.skipped, 5);
    assert_eq!(stats.total_reward, 2.5);
    assert_eq!(stats.mean_loss, 0.0);
    assert_eq!(agent.q_network().parameters(), before);
}

#[test]
fn test_greedy_selection_failure_is_an_error() {
    let trainer = Trainer::new(TrainerOptions::default()).unwrap();
    let mut agent = agent(0.0);
    let mut env = Broken { steps: 0 };

    let result = trainer.run_episode(&mut agent, &mut env);
    assert!(matches!(result, Err(DqnError::DimensionMismatch { .. })));
}

#[test]
fn test_run_collects_history() {
    let trainer = Trainer::new(TrainerOptions {
        episodes: 5,
        max_steps_per_episode: 50,
        normalize_states: true,
        log_every: 2,
        ..TrainerOptions::default()
    })
    .unwrap();
    let mut agent = agent(0.3);
    let mut env = Corridor::new(4);

    let history = trainer.run(&mut agent, &mut env).unwrap();
    assert_eq!(history.len(), 5);
    assert!(history.iter().all(|s| s.steps >= 1 && s.steps <= 50));
    assert!(agent.memory().len() <= 16);
}

#[test]
fn test_zero_step_cap_rejected() {
    let options = TrainerOptions { max_steps_per_episode: 0, ..TrainerOptions::default() };
    assert!(Trainer::new(options).is_err());
}
