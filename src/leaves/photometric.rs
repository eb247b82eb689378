use crate::foundation::error::{AugError, AugResult};
use crate::random::context::RandomContext;
use crate::random::distribution::Distribution;
use crate::targets::augmentable::Augmentable;
use crate::transform::core::Transform;
use serde::{Deserialize, Serialize};

/// Add a sampled `delta` (rounded) to every colour channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Brightness {
    /// Channel offset.
    pub delta: Distribution,
}

/// Change contrast by a sampled `factor` percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contrast {
    /// Contrast change in percent; `0` leaves the image unchanged.
    pub factor: Distribution,
}

/// Gaussian blur with a sampled `sigma`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaussianBlur {
    /// Standard deviation in pixels; must not go below zero.
    pub sigma: Distribution,
}

impl Brightness {
    /// Brightness with offsets drawn from `delta`.
    pub fn new(delta: Distribution) -> AugResult<Self> {
        delta.validate()?;
        Ok(Self { delta })
    }
}

impl Contrast {
    /// Contrast with factors drawn from `factor`.
    pub fn new(factor: Distribution) -> AugResult<Self> {
        factor.validate()?;
        Ok(Self { factor })
    }
}

impl GaussianBlur {
    /// Blur with sigmas drawn from `sigma`.
    pub fn new(sigma: Distribution) -> AugResult<Self> {
        sigma.validate()?;
        if sigma.min_value() < 0.0 {
            return Err(AugError::invalid_distribution(format!(
                "gaussian_blur sigma must be >= 0 (minimum {})",
                sigma.min_value()
            )));
        }
        Ok(Self { sigma })
    }
}

impl<I: Augmentable> Transform<I> for Brightness {
    fn name(&self) -> &str {
        "brightness"
    }

    fn apply(&self, image: I, ctx: &mut RandomContext) -> AugResult<I> {
        let delta = self.delta.sample(ctx, "delta")?;
        Ok(image.brighten(delta.round() as i32))
    }
}

impl<I: Augmentable> Transform<I> for Contrast {
    fn name(&self) -> &str {
        "contrast"
    }

    fn apply(&self, image: I, ctx: &mut RandomContext) -> AugResult<I> {
        let factor = self.factor.sample(ctx, "factor")?;
        Ok(image.contrast(factor as f32))
    }
}

impl<I: Augmentable> Transform<I> for GaussianBlur {
    fn name(&self) -> &str {
        "gaussian_blur"
    }

    fn apply(&self, image: I, ctx: &mut RandomContext) -> AugResult<I> {
        let sigma = self.sigma.sample(ctx, "sigma")?;
        Ok(image.blur(sigma as f32))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/leaves/photometric.rs"]
mod tests;
