//! Synthetic input series.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{PeakError, PeakResult};

/// Input value per time step, `X_in[t]` for `t` in `0..N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSeries(Vec<f64>);

impl InputSeries {
    /// Draw `steps` values uniformly from `[0, value_max)`.
    ///
    /// The same seed always yields the same series.
    pub fn generate(seed: u64, steps: usize, value_max: f64) -> PeakResult<Self> {
        if !value_max.is_finite() || value_max <= 0.0 {
            return Err(PeakError::InvalidConfiguration(format!(
                "value_max must be a positive number, got {value_max}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..steps).map(|_| rng.gen_range(0.0..value_max)).collect();
        Ok(Self(values))
    }

    /// Wrap explicit values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, t: usize) -> Option<f64> {
        self.0.get(t).copied()
    }

    /// Largest value (XM), `None` for an empty series.
    pub fn max(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}
