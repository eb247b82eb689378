use crate::foundation::error::{AugError, AugResult};
use crate::random::context::RandomContext;
use crate::random::sampler::{sample_choice, sample_uniform};
use serde::{Deserialize, Serialize};

/// Serializable scalar distribution used by leaf parameters.
///
/// JSON forms: `0.5` (constant), `[low, high]` or `{"low": .., "high": ..}`
/// (uniform), `{"choice": [..], "weights": [..]}` (weighted choice, weights
/// optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DistributionRepr", into = "DistributionRepr")]
pub enum Distribution {
    /// Fixed value; sampling draws nothing.
    Constant(f64),
    /// Uniform over `[low, high)`.
    Uniform {
        /// Inclusive lower bound.
        low: f64,
        /// Exclusive upper bound.
        high: f64,
    },
    /// One of `values`, optionally weighted.
    Choice {
        /// Candidate values.
        values: Vec<f64>,
        /// Relative weights, uniform when absent.
        weights: Option<Vec<f64>>,
    },
}

impl Distribution {
    /// Uniform distribution over `[low, high)`.
    pub fn uniform(low: f64, high: f64) -> Self {
        Self::Uniform { low, high }
    }

    /// Check bounds and weights without drawing.
    pub fn validate(&self) -> AugResult<()> {
        match self {
            Self::Constant(v) => {
                if !v.is_finite() {
                    return Err(AugError::invalid_distribution(
                        "constant must be finite",
                    ));
                }
            }
            Self::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low > high {
                    return Err(AugError::invalid_distribution(format!(
                        "uniform needs finite low <= high (got [{low}, {high}])"
                    )));
                }
            }
            Self::Choice { values, weights } => {
                if values.is_empty() {
                    return Err(AugError::invalid_distribution(
                        "choice needs at least one value",
                    ));
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(AugError::invalid_distribution(
                        "choice values must be finite",
                    ));
                }
                if let Some(w) = weights {
                    if w.len() != values.len() {
                        return Err(AugError::invalid_distribution(format!(
                            "choice has {} value(s) but {} weight(s)",
                            values.len(),
                            w.len()
                        )));
                    }
                    if w.iter().any(|x| !x.is_finite() || *x < 0.0) {
                        return Err(AugError::invalid_distribution(
                            "choice weights must be finite and >= 0",
                        ));
                    }
                    let total: f64 = w.iter().sum();
                    if !total.is_finite() || total <= 0.0 {
                        return Err(AugError::invalid_distribution(
                            "choice weights must have a finite sum > 0",
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Smallest value the distribution can produce.
    pub fn min_value(&self) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Uniform { low, .. } => *low,
            Self::Choice { values, .. } => values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }

    /// Sample a value, recording it under `name`.
    pub fn sample(&self, ctx: &mut RandomContext, name: &str) -> AugResult<f64> {
        match self {
            Self::Constant(v) => Ok(*v),
            Self::Uniform { low, high } => sample_uniform(ctx, name, *low, *high),
            Self::Choice { values, weights } => {
                let idx = match weights {
                    Some(w) => sample_choice(ctx, name, w)?,
                    None => sample_choice(ctx, name, &vec![1.0; values.len()])?,
                };
                values.get(idx).copied().ok_or_else(|| {
                    AugError::trace_mismatch(format!("'{name}' index {idx} out of range"))
                })
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DistributionRepr {
    Constant(f64),
    Range([f64; 2]),
    Bounds {
        low: f64,
        high: f64,
    },
    Choice {
        choice: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<f64>>,
    },
}

impl From<DistributionRepr> for Distribution {
    fn from(r: DistributionRepr) -> Self {
        match r {
            DistributionRepr::Constant(v) => Self::Constant(v),
            DistributionRepr::Range([low, high]) | DistributionRepr::Bounds { low, high } => {
                Self::Uniform { low, high }
            }
            DistributionRepr::Choice { choice, weights } => Self::Choice {
                values: choice,
                weights,
            },
        }
    }
}

impl From<Distribution> for DistributionRepr {
    fn from(d: Distribution) -> Self {
        match d {
            Distribution::Constant(v) => Self::Constant(v),
            Distribution::Uniform { low, high } => Self::Range([low, high]),
            Distribution::Choice { values, weights } => Self::Choice {
                choice: values,
                weights,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/random/distribution.rs"]
mod tests;
