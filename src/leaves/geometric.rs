//! Spatial leaves: flips, quarter turns and random crops.

use crate::foundation::error::{AugError, AugResult};
use crate::random::context::RandomContext;
use crate::random::sampler::sample_int;
use crate::targets::augmentable::{Augmentable, CropRect, Rotation};
use crate::transform::core::Transform;
use serde::{Deserialize, Serialize};

/// Mirror left to right. Draws nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipHorizontal;

/// Mirror top to bottom. Draws nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipVertical;

/// Fixed quarter turn. Draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotate90 {
    rotation: Rotation,
}

impl Rotate90 {
    /// 90° counter-clockwise (`rotate_left`).
    pub fn left() -> Self {
        Self {
            rotation: Rotation::Left,
        }
    }

    /// 90° clockwise (`rotate_right`).
    pub fn right() -> Self {
        Self {
            rotation: Rotation::Right,
        }
    }

    /// Direction of the turn.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

/// Cut a `width`×`height` window at a uniformly drawn position.
///
/// Draws `x` then `y` as integers; a target smaller than the window is a
/// [`AugError::ShapeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomCrop {
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
}

impl RandomCrop {
    /// Window of `width`×`height`; both must be non-zero.
    pub fn new(width: u32, height: u32) -> AugResult<Self> {
        let crop = Self { width, height };
        crop.validate()?;
        Ok(crop)
    }

    pub(crate) fn validate(&self) -> AugResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AugError::invalid_configuration(format!(
                "random_crop window must be non-empty (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl<I: Augmentable> Transform<I> for FlipHorizontal {
    fn name(&self) -> &str {
        "flip_horizontal"
    }

    fn apply(&self, image: I, _ctx: &mut RandomContext) -> AugResult<I> {
        Ok(image.flip_horizontal())
    }
}

impl<I: Augmentable> Transform<I> for FlipVertical {
    fn name(&self) -> &str {
        "flip_vertical"
    }

    fn apply(&self, image: I, _ctx: &mut RandomContext) -> AugResult<I> {
        Ok(image.flip_vertical())
    }
}

impl<I: Augmentable> Transform<I> for Rotate90 {
    fn name(&self) -> &str {
        match self.rotation {
            Rotation::Left => "rotate_left",
            Rotation::Right => "rotate_right",
        }
    }

    fn apply(&self, image: I, _ctx: &mut RandomContext) -> AugResult<I> {
        Ok(image.rotate90(self.rotation))
    }
}

impl<I: Augmentable> Transform<I> for RandomCrop {
    fn name(&self) -> &str {
        "random_crop"
    }

    fn apply(&self, image: I, ctx: &mut RandomContext) -> AugResult<I> {
        let (w, h) = image.dimensions()?;
        if self.width > w || self.height > h {
            return Err(AugError::shape_mismatch(format!(
                "random_crop {}x{} does not fit a {w}x{h} input",
                self.width, self.height
            )));
        }
        let x = sample_int(ctx, "x", 0, i64::from(w - self.width))?;
        let y = sample_int(ctx, "y", 0, i64::from(h - self.height))?;
        image.crop(CropRect {
            x: x as u32,
            y: y as u32,
            width: self.width,
            height: self.height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/leaves/geometric.rs"]
mod tests;
