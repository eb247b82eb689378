use crate::foundation::error::AugResult;
use crate::targets::augmentable::{Augmentable, CropRect, Rotation};
use serde::{Deserialize, Serialize};

/// Point annotations in continuous pixel coordinates of a `width`×`height` frame.
///
/// Coordinates follow the pixel-edge convention: `(0, 0)` is the top-left
/// corner and `(width, height)` the bottom-right one. Points that leave the
/// frame after a crop are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoints {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// `[x, y]` pairs.
    pub points: Vec<[f32; 2]>,
}

impl Keypoints {
    /// Points on a `width`×`height` frame.
    pub fn new(width: u32, height: u32, points: Vec<[f32; 2]>) -> Self {
        Self {
            width,
            height,
            points,
        }
    }

    fn map_points(mut self, f: impl Fn([f32; 2]) -> [f32; 2]) -> Self {
        for p in &mut self.points {
            *p = f(*p);
        }
        self
    }
}

impl Augmentable for Keypoints {
    fn dimensions(&self) -> AugResult<(u32, u32)> {
        Ok((self.width, self.height))
    }

    fn flip_horizontal(self) -> Self {
        let w = self.width as f32;
        self.map_points(|[x, y]| [w - x, y])
    }

    fn flip_vertical(self) -> Self {
        let h = self.height as f32;
        self.map_points(|[x, y]| [x, h - y])
    }

    fn rotate90(self, rotation: Rotation) -> Self {
        let (w, h) = (self.width as f32, self.height as f32);
        let (width, height) = (self.height, self.width);
        let mut out = match rotation {
            Rotation::Right => self.map_points(|[x, y]| [h - y, x]),
            Rotation::Left => self.map_points(|[x, y]| [y, w - x]),
        };
        out.width = width;
        out.height = height;
        out
    }

    fn crop(self, rect: CropRect) -> AugResult<Self> {
        rect.check_within(self.width, self.height)?;
        let (dx, dy) = (rect.x as f32, rect.y as f32);
        let mut out = self.map_points(|[x, y]| [x - dx, y - dy]);
        out.width = rect.width;
        out.height = rect.height;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/targets/keypoints.rs"]
mod tests;
