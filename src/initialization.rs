use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::error::{DqnError, Result};

/// Weight initialization strategies for one affine layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization, applied to weights and biases
    #[default]
    XavierUniform,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Symmetric bound `sqrt(6 / (fan_in + fan_out))`.
    pub fn xavier_bound(fan_in: usize, fan_out: usize) -> f32 {
        (6.0 / (fan_in + fan_out) as f32).sqrt()
    }

    fn range(&self, fan_in: usize, fan_out: usize) -> Result<Option<(f32, f32)>> {
        match *self {
            WeightInit::XavierUniform => {
                let limit = Self::xavier_bound(fan_in, fan_out);
                Ok(Some((-limit, limit)))
            }
            WeightInit::Uniform { min, max } => {
                if !(min < max) || !min.is_finite() || !max.is_finite() {
                    return Err(DqnError::invalid_parameter(
                        "weight_init".to_string(),
                        format!("uniform range [{}, {}) is empty or not finite", min, max),
                    ));
                }
                Ok(Some((min, max)))
            }
            WeightInit::Zeros => Ok(None),
        }
    }

    /// Initialize a `fan_out x fan_in` weight matrix.
    pub fn initialize_weights<R: Rng + ?Sized>(
        &self,
        fan_in: usize,
        fan_out: usize,
        rng: &mut R,
    ) -> Result<Array2<f32>> {
        let shape = (fan_out, fan_in);
        Ok(match self.range(fan_in, fan_out)? {
            Some((low, high)) => Array2::random_using(shape, Uniform::new(low, high), rng),
            None => Array2::zeros(shape),
        })
    }

    /// Initialize the `fan_out` biases of the same layer, from the same range as its weights.
    pub fn initialize_biases<R: Rng + ?Sized>(
        &self,
        fan_in: usize,
        fan_out: usize,
        rng: &mut R,
    ) -> Result<Array1<f32>> {
        Ok(match self.range(fan_in, fan_out)? {
            Some((low, high)) => Array1::random_using(fan_out, Uniform::new(low, high), rng),
            None => Array1::zeros(fan_out),
        })
    }
}
