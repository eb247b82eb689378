//! Parameter-space sampling.
//!
//! Every function here validates its distribution, then draws exactly one unit
//! of randomness (one `u64`) from the context, so the number of draws made by
//! an invocation depends only on the decisions taken, never on the values.

use crate::foundation::error::{AugError, AugResult};
use crate::random::context::RandomContext;
use crate::trace::record::ParamValue;

const UNIT_SCALE: f64 = 1.0 / ((1u64 << 53) as f64);

/// Map 64 random bits to `[0, 1)` with 53 bits of precision.
pub(crate) fn unit_f64(bits: u64) -> f64 {
    ((bits >> 11) as f64) * UNIT_SCALE
}

/// Sample a float uniformly from `[low, high)`.
///
/// `low == high` is allowed and always yields `low`.
pub fn sample_uniform(ctx: &mut RandomContext, name: &str, low: f64, high: f64) -> AugResult<f64> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(AugError::invalid_distribution(format!(
            "uniform '{name}' needs finite low <= high (got [{low}, {high}])"
        )));
    }
    let v = ctx.draw(name, "float", |bits| {
        ParamValue::Float(low + (high - low) * unit_f64(bits))
    })?;
    let value = v
        .as_float()
        .ok_or_else(|| AugError::trace_mismatch(format!("'{name}' is not a float")))?;
    // Rounding may land exactly on `high`, so the replay check is inclusive.
    if !(low..=high).contains(&value) {
        return Err(AugError::trace_mismatch(format!(
            "'{name}' recorded {value} outside [{low}, {high})"
        )));
    }
    Ok(value)
}

/// Sample one index from non-negative `weights` by cumulative-weight inversion.
///
/// Ties resolve to the lowest index; zero-weight alternatives are never selected.
pub fn sample_choice(ctx: &mut RandomContext, name: &str, weights: &[f64]) -> AugResult<usize> {
    let total = validate_weights(name, weights)?;
    let v = ctx.draw(name, "index", |bits| {
        ParamValue::Index(choose_index(weights, total, unit_f64(bits)) as u32)
    })?;
    let idx = v
        .as_index()
        .ok_or_else(|| AugError::trace_mismatch(format!("'{name}' is not an index")))?
        as usize;
    // Only reachable on replay of a foreign trace.
    if idx >= weights.len() || weights[idx] <= 0.0 {
        return Err(AugError::trace_mismatch(format!(
            "'{name}' recorded index {idx} which is not selectable among {} weight(s)",
            weights.len()
        )));
    }
    Ok(idx)
}

/// Sample `true` with probability `p`.
pub fn sample_bernoulli(ctx: &mut RandomContext, name: &str, p: f64) -> AugResult<bool> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(AugError::invalid_distribution(format!(
            "bernoulli '{name}' probability must be in [0, 1] (got {p})"
        )));
    }
    let v = ctx.draw(name, "bool", |bits| ParamValue::Bool(unit_f64(bits) < p))?;
    v.as_bool()
        .ok_or_else(|| AugError::trace_mismatch(format!("'{name}' is not a bool")))
}

/// Sample an integer uniformly from the inclusive range `[low, high]`.
pub fn sample_int(ctx: &mut RandomContext, name: &str, low: i64, high: i64) -> AugResult<i64> {
    if low > high {
        return Err(AugError::invalid_distribution(format!(
            "int '{name}' needs low <= high (got [{low}, {high}])"
        )));
    }
    let span = (i128::from(high) - i128::from(low) + 1) as u128;
    let v = ctx.draw(name, "int", |bits| {
        // Multiply-shift keeps this to a single draw.
        let offset = ((u128::from(bits) * span) >> 64) as i128;
        ParamValue::Int((i128::from(low) + offset) as i64)
    })?;
    let value = v
        .as_int()
        .ok_or_else(|| AugError::trace_mismatch(format!("'{name}' is not an int")))?;
    if value < low || value > high {
        return Err(AugError::trace_mismatch(format!(
            "'{name}' recorded {value} outside [{low}, {high}]"
        )));
    }
    Ok(value)
}

fn validate_weights(name: &str, weights: &[f64]) -> AugResult<f64> {
    if weights.is_empty() {
        return Err(AugError::invalid_distribution(format!(
            "choice '{name}' needs at least one weight"
        )));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(AugError::invalid_distribution(format!(
            "choice '{name}' weights must be finite and >= 0 (got {w})"
        )));
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(AugError::invalid_distribution(format!(
            "choice '{name}' weights must sum to > 0"
        )));
    }
    Ok(total)
}

pub(crate) fn choose_index(weights: &[f64], total: f64, u: f64) -> usize {
    let target = u * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return i;
        }
    }
    // Rounding can leave `target` at the very top of the range.
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/random/sampler.rs"]
mod tests;
