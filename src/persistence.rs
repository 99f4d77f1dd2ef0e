//! Saving and restoring a trained agent.
//!
//! A snapshot holds the two weight matrices as row-major nested vectors, both
//! bias vectors and the three hyperparameters. It is encoded with `bincode` and
//! carries no version field: the layer sizes of the agent being restored must
//! match the ones the snapshot was taken from, otherwise loading fails with
//! [`DqnError::DimensionMismatch`] and the agent is left untouched.

use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::agent::{clamp_unit, DqnAgent};
use crate::error::{DqnError, Result};
use crate::network::NetworkParameters;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub w1: Vec<Vec<f32>>,
    pub w2: Vec<Vec<f32>>,
    pub b1: Vec<f32>,
    pub b2: Vec<f32>,
    pub gamma: f32,
    pub epsilon: f32,
    pub learning_rate: f32,
}

impl AgentSnapshot {
    pub fn capture(agent: &DqnAgent) -> Self {
        let network = agent.q_network();
        AgentSnapshot {
            w1: matrix_to_rows(network.w1()),
            w2: matrix_to_rows(network.w2()),
            b1: network.b1().to_vec(),
            b2: network.b2().to_vec(),
            gamma: agent.gamma(),
            epsilon: agent.epsilon(),
            learning_rate: agent.learning_rate(),
        }
    }

    /// Write the snapshot's parameters and hyperparameters into `agent`.
    pub fn restore(self, agent: &mut DqnAgent) -> Result<()> {
        let parameters = NetworkParameters {
            w1: rows_to_matrix("w1", self.w1)?,
            b1: Array1::from_vec(self.b1),
            w2: rows_to_matrix("w2", self.w2)?,
            b2: Array1::from_vec(self.b2),
        };
        // Validate everything before the first mutation.
        if !(self.learning_rate.is_finite() && self.learning_rate >= 0.0) {
            return Err(DqnError::invalid_parameter(
                "learning_rate".to_string(),
                format!("snapshot holds {}", self.learning_rate),
            ));
        }
        let gamma = clamp_unit("gamma", self.gamma)?;
        let epsilon = clamp_unit("epsilon", self.epsilon)?;
        agent.q_network_mut().set_parameters(parameters)?;
        agent.set_gamma(gamma)?;
        agent.set_epsilon(epsilon)?;
        agent.set_learning_rate(self.learning_rate)
    }
}

impl DqnAgent {
    /// Serialize the agent's parameters and hyperparameters to `writer`.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = AgentSnapshot::capture(self);
        bincode::serialize_into(writer, &snapshot)?;
        Ok(())
    }

    /// Restore parameters and hyperparameters previously written by [`DqnAgent::save`].
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        let snapshot: AgentSnapshot = bincode::deserialize_from(reader)?;
        snapshot.restore(self)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        log::debug!("Saved agent snapshot to {}", path.display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        self.load(reader)?;
        log::debug!("Loaded agent snapshot from {}", path.display());
        Ok(())
    }
}

fn matrix_to_rows(matrix: &Array2<f32>) -> Vec<Vec<f32>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

fn rows_to_matrix(name: &str, rows: Vec<Vec<f32>>) -> Result<Array2<f32>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
        return Err(DqnError::dimension_mismatch(
            format!("{} rows of length {}", name, n_cols),
            format!("a row of length {}", bad.len()),
        ));
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| DqnError::dimension_mismatch(format!("{} as a {}x{} matrix", name, n_rows, n_cols), e.to_string()))
}
