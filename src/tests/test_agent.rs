use ndarray::{arr1, array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::seeded_network;
use crate::activations::Activation;
use crate::agent::{DqnAgent, DqnAgentBuilder};
use crate::config::DqnConfig;
use crate::error::DqnError;
use crate::initialization::WeightInit;
use crate::network::{NetworkParameters, ValueNetwork};
use crate::replay_buffer::Transition;
use crate::utils::{argmax, max_value};

fn agent_with(epsilon: f32, gamma: f32) -> DqnAgent {
    DqnAgentBuilder::new()
        .layer_sizes(4, 10, 2)
        .epsilon(epsilon)
        .gamma(gamma)
        .learning_rate(0.001)
        .seed(11)
        .build()
        .unwrap()
}

/// A network whose Q-values are exactly `b2` for every state.
fn constant_q_network(q_values: &[f32]) -> ValueNetwork {
    let parameters = NetworkParameters {
        w1: Array2::zeros((3, 2)),
        b1: arr1(&[0.0, 0.0, 0.0]),
        w2: Array2::zeros((q_values.len(), 3)),
        b2: arr1(q_values),
    };
    ValueNetwork::from_parameters(parameters, Activation::Relu).unwrap()
}

#[test]
fn test_builder() {
    let agent = DqnAgentBuilder::new()
        .layer_sizes(6, 16, 3)
        .buffer_capacity(50)
        .gamma(0.95)
        .epsilon(0.3)
        .learning_rate(0.01)
        .activation(Activation::Tanh)
        .build()
        .unwrap();

    assert_eq!(agent.q_network().input_size(), 6);
    assert_eq!(agent.q_network().hidden_size(), 16);
    assert_eq!(agent.q_network().output_size(), 3);
    assert_eq!(agent.memory().capacity(), 50);
    assert_eq!(agent.gamma(), 0.95);
    assert_eq!(agent.epsilon(), 0.3);
    assert_eq!(agent.learning_rate(), 0.01);
}

#[test]
fn test_builder_rejects_invalid_hyperparameters() {
    assert!(DqnAgentBuilder::new().gamma(1.1).build().is_err());
    assert!(DqnAgentBuilder::new().epsilon(2.0).build().is_err());
    assert!(DqnAgentBuilder::new().learning_rate(-0.1).build().is_err());
    assert!(DqnAgentBuilder::new().buffer_capacity(0).build().is_err());
}

#[test]
fn test_same_seed_same_agent() {
    let mut a = agent_with(0.5, 0.9);
    let mut b = agent_with(0.5, 0.9);
    assert_eq!(a.q_network().parameters(), b.q_network().parameters());

    let state = array![1.0, 2.0, 3.0, 4.0];
    for _ in 0..20 {
        assert_eq!(
            a.select_action(state.view(), 2).unwrap(),
            b.select_action(state.view(), 2).unwrap()
        );
    }
}

#[test]
fn test_greedy_action_is_argmax() {
    let mut agent = agent_with(0.0, 0.9);
    let state = array![1.0, 2.0, 3.0, 4.0];
    let expected = argmax(agent.q_values(state.view()).unwrap().view()).unwrap();

    for _ in 0..20 {
        assert_eq!(agent.select_action(state.view(), 2).unwrap(), expected);
    }
}

#[test]
fn test_greedy_ties_pick_lowest_index() {
    let config = DqnConfig { epsilon: 0.0, ..DqnConfig::default() };
    let mut agent = DqnAgent::with_network(constant_q_network(&[1.0, 3.0, 3.0]), config).unwrap();
    assert_eq!(agent.select_action(array![0.5, 0.5].view(), 3).unwrap(), 1);

    let mut rng = StdRng::seed_from_u64(0);
    let zeros = ValueNetwork::with_init(2, 3, 4, Activation::Relu, WeightInit::Zeros, &mut rng).unwrap();
    let config = DqnConfig { epsilon: 0.0, ..DqnConfig::default() };
    let mut agent = DqnAgent::with_network(zeros, config).unwrap();
    assert_eq!(agent.select_action(array![1.0, 1.0].view(), 4).unwrap(), 0);
}

#[test]
fn test_greedy_respects_num_actions() {
    let config = DqnConfig { epsilon: 0.0, ..DqnConfig::default() };
    let mut agent = DqnAgent::with_network(constant_q_network(&[1.0, 2.0, 9.0]), config).unwrap();
    assert_eq!(agent.select_action(array![0.0, 0.0].view(), 2).unwrap(), 1);
    assert_eq!(agent.select_action(array![0.0, 0.0].view(), 3).unwrap(), 2);
}

#[test]
fn test_full_exploration_never_predicts() {
    let mut agent = DqnAgentBuilder::new()
        .layer_sizes(4, 10, 4)
        .epsilon(1.0)
        .seed(5)
        .build()
        .unwrap();

    // A state of the wrong length would fail inside predict
    let bad_state = array![1.0];
    let draws = 8000;
    let mut counts = [0usize; 4];
    for _ in 0..draws {
        counts[agent.select_action(bad_state.view(), 4).unwrap()] += 1;
    }
    for count in counts {
        let share = count as f32 / draws as f32;
        assert!((0.2..0.3).contains(&share), "share {}", share);
    }
}

#[test]
fn test_select_action_invalid_num_actions() {
    let mut agent = agent_with(0.0, 0.9);
    let state = array![1.0, 2.0, 3.0, 4.0];
    assert!(matches!(agent.select_action(state.view(), 0), Err(DqnError::InvalidParameter { .. })));
    assert!(matches!(agent.select_action(state.view(), 3), Err(DqnError::InvalidParameter { .. })));
}

#[test]
fn test_terminal_target_is_reward() {
    for gamma in [0.0, 0.5, 0.99] {
        let agent = agent_with(0.0, gamma);
        let next_state = array![2.0, 3.0, 4.0, 5.0];
        let next_q = agent.q_values(next_state.view()).unwrap();

        let target = agent.bellman_target(next_state.view(), 1, 2.5, true).unwrap();
        assert_eq!(target[1], 2.5);
        assert_eq!(target[0], next_q[0]);
    }
}

#[test]
fn test_non_terminal_target() {
    let agent = agent_with(0.0, 0.0);
    let next_state = array![2.0, 3.0, 4.0, 5.0];
    let target = agent.bellman_target(next_state.view(), 0, -1.5, false).unwrap();
    assert_eq!(target[0], -1.5);

    let agent = agent_with(0.0, 0.5);
    let next_q = agent.q_values(next_state.view()).unwrap();
    let max_next_q = max_value(next_q.view()).unwrap();
    let target = agent.bellman_target(next_state.view(), 0, 1.0, false).unwrap();
    assert_eq!(target[0], 1.0 + 0.5 * max_next_q);
    assert_eq!(target[1], next_q[1]);
}

#[test]
fn test_train_concrete_scenario() {
    let mut agent = DqnAgent::new(DqnConfig { seed: Some(0), ..DqnConfig::default() }).unwrap();
    let state = array![1.0, 2.0, 3.0, 4.0];
    let next_state = array![2.0, 3.0, 4.0, 5.0];
    let before = agent.q_network().parameters();

    assert_eq!(agent.q_values(state.view()).unwrap().len(), 2);
    agent.train(state.view(), next_state.view(), 1, 1.0, false).unwrap();

    let network = agent.q_network();
    assert_eq!(network.w1().shape(), [10, 4]);
    assert_eq!(network.b1().shape(), [10]);
    assert_eq!(network.w2().shape(), [2, 10]);
    assert_eq!(network.b2().shape(), [2]);
    assert_ne!(network.parameters(), before);
}

#[test]
fn test_train_returns_pre_update_loss() {
    let mut agent = agent_with(0.0, 0.9);
    let state = array![0.1, 0.2, 0.3, 0.4];
    let next_state = array![0.2, 0.3, 0.4, 0.5];

    let target = agent.bellman_target(next_state.view(), 0, 1.0, false).unwrap();
    let current = agent.q_values(state.view()).unwrap();
    let expected = agent.q_network().loss(current.view(), target.view()).unwrap();

    let loss = agent.train(state.view(), next_state.view(), 0, 1.0, false).unwrap();
    assert_eq!(loss, expected);
}

#[test]
fn test_repeated_training_reduces_error() {
    let mut agent = DqnAgentBuilder::new()
        .layer_sizes(4, 10, 2)
        .activation(Activation::Tanh)
        .learning_rate(1e-3)
        .seed(3)
        .build()
        .unwrap();
    let state = array![0.25, 0.5, 0.75, 1.0];
    let reward = 2.0;
    let error = |agent: &DqnAgent| {
        let q = agent.q_values(state.view()).unwrap();
        (q[1] - reward).powi(2)
    };

    let initial = error(&agent);
    let mut previous = initial;
    for _ in 0..60 {
        agent.train(state.view(), state.view(), 1, reward, true).unwrap();
        let current = error(&agent);
        assert!(current < previous, "{} !< {}", current, previous);
        previous = current;
    }
    assert!(previous < initial);
}

#[test]
fn test_repeated_training_with_relu() {
    let mut agent = agent_with(0.0, 0.9);
    let state = array![1.0, 2.0, 3.0, 4.0];
    let reward = -1.0;
    let error = |agent: &DqnAgent| (agent.q_values(state.view()).unwrap()[0] - reward).powi(2);

    let initial = error(&agent);
    for _ in 0..100 {
        agent.train(state.view(), state.view(), 0, reward, true).unwrap();
    }
    assert!(error(&agent) < initial);
}

#[test]
fn test_invalid_action_leaves_network_untouched() {
    let mut agent = agent_with(0.0, 0.9);
    let before = agent.q_network().parameters();
    let state = array![1.0, 2.0, 3.0, 4.0];

    let result = agent.train(state.view(), state.view(), 2, 1.0, false);
    assert!(matches!(result, Err(DqnError::IndexOutOfRange { index: 2, len: 2 })));
    assert_eq!(agent.q_network().parameters(), before);
}

#[test]
fn test_mismatched_state_leaves_network_untouched() {
    let mut agent = agent_with(0.0, 0.9);
    let before = agent.q_network().parameters();
    let good = array![1.0, 2.0, 3.0, 4.0];
    let bad = array![1.0, 2.0];

    assert!(matches!(agent.train(bad.view(), good.view(), 0, 1.0, false), Err(DqnError::DimensionMismatch { .. })));
    assert!(matches!(agent.train(good.view(), bad.view(), 0, 1.0, false), Err(DqnError::DimensionMismatch { .. })));
    assert_eq!(agent.q_network().parameters(), before);
}

#[test]
fn test_train_does_not_touch_memory() {
    let mut agent = agent_with(0.0, 0.9);
    let transition = Transition::new(array![1.0, 2.0, 3.0, 4.0], 1, 1.0, array![2.0, 3.0, 4.0, 5.0], false);

    agent.train_transition(&transition).unwrap();
    assert!(agent.memory().is_empty());

    agent.remember(transition.clone());
    assert_eq!(agent.memory().len(), 1);
    let batch = agent.sample_memory(3).unwrap();
    assert_eq!(batch, vec![transition.clone(), transition.clone(), transition]);
}

#[test]
fn test_sample_memory_empty() {
    let mut agent = agent_with(0.0, 0.9);
    assert!(matches!(agent.sample_memory(1), Err(DqnError::EmptyStore)));
}

#[test]
fn test_hyperparameter_setters() {
    let mut agent = agent_with(0.1, 0.9);
    agent.set_epsilon(1.5).unwrap();
    assert_eq!(agent.epsilon(), 1.0);
    agent.set_gamma(-0.2).unwrap();
    assert_eq!(agent.gamma(), 0.0);
    agent.set_learning_rate(0.05).unwrap();
    assert_eq!(agent.learning_rate(), 0.05);
    assert!(agent.set_learning_rate(f32::INFINITY).is_err());
}

#[test]
fn test_with_network_keeps_weights() {
    let network = seeded_network(3, 5, 2, Activation::Sigmoid);
    let parameters = network.parameters();
    let agent = DqnAgent::with_network(network, DqnConfig::default()).unwrap();
    assert_eq!(agent.q_network().parameters(), parameters);
    assert_eq!(agent.q_network().input_size(), 3);
    assert_eq!(agent.q_network().w1(), &parameters.w1);
}

#[test]
fn test_nan_hyperparameters_rejected() {
    let mut agent = agent_with(0.1, 0.9);
    assert!(matches!(agent.set_gamma(f32::NAN), Err(DqnError::InvalidParameter { .. })));
    assert!(matches!(agent.set_epsilon(f32::NAN), Err(DqnError::InvalidParameter { .. })));
    assert_eq!(agent.gamma(), 0.9);
    assert_eq!(agent.epsilon(), 0.1);
}
