use ndarray::Array1;
use rand::Rng;
use rand_distr::Uniform;
use serde::{Serialize, Deserialize};
use std::collections::VecDeque;

use crate::error::{DqnError, Result};

/// One observed `(state, action, reward, next_state, done)` tuple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

impl Transition {
    pub fn new(state: Array1<f32>, action: usize, reward: f32, next_state: Array1<f32>, done: bool) -> Self {
        Transition {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}

/// Fixed-capacity FIFO memory of transitions with uniform sampling.
#[derive(Clone, Debug)]
pub struct ExperienceStore {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ExperienceStore {
    /// Create an empty store holding at most `capacity` transitions.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DqnError::invalid_parameter("capacity", "must be greater than 0"));
        }
        Ok(ExperienceStore {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a transition, evicting the oldest one when the store is full.
    pub fn insert(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `batch_size` transitions uniformly at random, with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Transition>> {
        if self.buffer.is_empty() {
            return Err(DqnError::EmptyStore);
        }
        let indices = Uniform::new(0, self.buffer.len());
        Ok((0..batch_size)
            .map(|_| &self.buffer[rng.sample(indices)])
            .collect())
    }

    /// Transitions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
