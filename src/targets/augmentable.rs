use crate::foundation::error::{AugError, AugResult};
use image::{GrayImage, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

/// Quarter turn direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// 90° counter-clockwise.
    Left,
    /// 90° clockwise.
    Right,
}

/// Axis-aligned crop window in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
}

impl CropRect {
    /// Fail with [`AugError::ShapeMismatch`] unless the window fits in `width`×`height`.
    pub fn check_within(&self, width: u32, height: u32) -> AugResult<()> {
        let fits_x = self.x.checked_add(self.width).is_some_and(|r| r <= width);
        let fits_y = self.y.checked_add(self.height).is_some_and(|b| b <= height);
        if self.width == 0 || self.height == 0 || !fits_x || !fits_y {
            return Err(AugError::shape_mismatch(format!(
                "crop {}x{} at ({}, {}) does not fit a {width}x{height} target",
                self.width, self.height, self.x, self.y
            )));
        }
        Ok(())
    }
}

/// Values the built-in leaves know how to transform.
///
/// Geometric operations must be implemented; photometric ones default to a
/// no-op so spatial-only targets (keypoints) pass through unchanged.
pub trait Augmentable: Sized + Send {
    /// `(width, height)` of the spatial frame.
    fn dimensions(&self) -> AugResult<(u32, u32)>;

    /// Mirror left to right.
    fn flip_horizontal(self) -> Self;

    /// Mirror top to bottom.
    fn flip_vertical(self) -> Self;

    /// Quarter turn; width and height swap.
    fn rotate90(self, rotation: Rotation) -> Self;

    /// Cut out `rect`.
    fn crop(self, rect: CropRect) -> AugResult<Self>;

    /// Add `delta` to every colour channel.
    fn brighten(self, _delta: i32) -> Self {
        self
    }

    /// Scale contrast by `factor` percent (`0` is unchanged).
    fn contrast(self, _factor: f32) -> Self {
        self
    }

    /// Gaussian blur with standard deviation `sigma`.
    fn blur(self, _sigma: f32) -> Self {
        self
    }
}

macro_rules! impl_augmentable_for_buffer {
    ($ty:ty) => {
        impl Augmentable for $ty {
            fn dimensions(&self) -> AugResult<(u32, u32)> {
                Ok(<$ty>::dimensions(self))
            }

            fn flip_horizontal(self) -> Self {
                imageops::flip_horizontal(&self)
            }

            fn flip_vertical(self) -> Self {
                imageops::flip_vertical(&self)
            }

            fn rotate90(self, rotation: Rotation) -> Self {
                match rotation {
                    Rotation::Left => imageops::rotate270(&self),
                    Rotation::Right => imageops::rotate90(&self),
                }
            }

            fn crop(self, rect: CropRect) -> AugResult<Self> {
                let (w, h) = <$ty>::dimensions(&self);
                rect.check_within(w, h)?;
                Ok(imageops::crop_imm(&self, rect.x, rect.y, rect.width, rect.height).to_image())
            }

            fn brighten(self, delta: i32) -> Self {
                if delta == 0 {
                    return self;
                }
                imageops::brighten(&self, delta)
            }

            fn contrast(self, factor: f32) -> Self {
                if factor == 0.0 {
                    return self;
                }
                imageops::contrast(&self, factor)
            }

            fn blur(self, sigma: f32) -> Self {
                if sigma <= 0.0 {
                    return self;
                }
                imageops::blur(&self, sigma)
            }
        }
    };
}

impl_augmentable_for_buffer!(RgbaImage);
impl_augmentable_for_buffer!(GrayImage);

#[cfg(test)]
#[path = "../../tests/unit/targets/augmentable.rs"]
mod tests;
