use crate::foundation::error::AugResult;
use crate::targets::augmentable::{Augmentable, CropRect, Rotation};
use serde::{Deserialize, Serialize};

/// Row-major 3×3 homogeneous matrix mapping into pixel coordinates.
pub type Mat3 = [[f64; 3]; 3];

// Each operation maps pixel coordinates `(u, v)` to new ones; composing that
// map onto a matrix is a change of its first two rows.
#[derive(Clone, Copy)]
enum PixelMap {
    FlipX(f64),
    FlipY(f64),
    Right(f64),
    Left(f64),
    Shift(f64, f64),
}

fn remap(m: &mut Mat3, map: PixelMap) {
    let [r0, r1, r2] = *m;
    let scaled = |k: f64, r: [f64; 3]| [k * r2[0] - r[0], k * r2[1] - r[1], k * r2[2] - r[2]];
    let (n0, n1) = match map {
        PixelMap::FlipX(w) => (scaled(w, r0), r1),
        PixelMap::FlipY(h) => (r0, scaled(h, r1)),
        PixelMap::Right(h) => (scaled(h, r1), r0),
        PixelMap::Left(w) => (r1, scaled(w, r0)),
        PixelMap::Shift(dx, dy) => (
            [r0[0] - dx * r2[0], r0[1] - dx * r2[1], r0[2] - dx * r2[2]],
            [r1[0] - dy * r2[0], r1[1] - dy * r2[1], r1[2] - dy * r2[2]],
        ),
    };
    *m = [n0, n1, r2];
}

fn rotation_map(rotation: Rotation, width: u32, height: u32) -> PixelMap {
    match rotation {
        Rotation::Right => PixelMap::Right(f64::from(height)),
        Rotation::Left => PixelMap::Left(f64::from(width)),
    }
}

/// Pinhole intrinsics `K` of the camera that produced a `width`×`height` frame.
///
/// Cropping shifts the principal point `(cx, cy)`; flips and quarter turns
/// rewrite `K` so that it keeps projecting into the transformed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraMatrix {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Intrinsic matrix.
    pub matrix: Mat3,
}

impl CameraMatrix {
    /// Intrinsics from focal lengths and principal point, no skew.
    pub fn new(width: u32, height: u32, fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            width,
            height,
            matrix: [[fx, 0.0, cx], [0.0, fy, cy], [0.0, 0.0, 1.0]],
        }
    }

    /// Principal point `(cx, cy)`.
    pub fn principal_point(&self) -> (f64, f64) {
        (self.matrix[0][2], self.matrix[1][2])
    }

    fn apply(mut self, map: PixelMap) -> Self {
        remap(&mut self.matrix, map);
        self
    }
}

impl Augmentable for CameraMatrix {
    fn dimensions(&self) -> AugResult<(u32, u32)> {
        Ok((self.width, self.height))
    }

    fn flip_horizontal(self) -> Self {
        let w = f64::from(self.width);
        self.apply(PixelMap::FlipX(w))
    }

    fn flip_vertical(self) -> Self {
        let h = f64::from(self.height);
        self.apply(PixelMap::FlipY(h))
    }

    fn rotate90(self, rotation: Rotation) -> Self {
        let map = rotation_map(rotation, self.width, self.height);
        let (width, height) = (self.height, self.width);
        Self {
            width,
            height,
            ..self.apply(map)
        }
    }

    fn crop(self, rect: CropRect) -> AugResult<Self> {
        rect.check_within(self.width, self.height)?;
        let out = self.apply(PixelMap::Shift(f64::from(rect.x), f64::from(rect.y)));
        Ok(Self {
            width: rect.width,
            height: rect.height,
            ..out
        })
    }
}

/// A stack of 2D homogeneous transforms into the pixel frame, one per item
/// (e.g. per-object affine maps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrices2D {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// The transforms.
    pub matrices: Vec<Mat3>,
}

impl Matrices2D {
    /// Transforms into a `width`×`height` frame.
    pub fn new(width: u32, height: u32, matrices: Vec<Mat3>) -> Self {
        Self {
            width,
            height,
            matrices,
        }
    }

    fn apply(mut self, map: PixelMap) -> Self {
        for m in &mut self.matrices {
            remap(m, map);
        }
        self
    }
}

impl Augmentable for Matrices2D {
    fn dimensions(&self) -> AugResult<(u32, u32)> {
        Ok((self.width, self.height))
    }

    fn flip_horizontal(self) -> Self {
        let w = f64::from(self.width);
        self.apply(PixelMap::FlipX(w))
    }

    fn flip_vertical(self) -> Self {
        let h = f64::from(self.height);
        self.apply(PixelMap::FlipY(h))
    }

    fn rotate90(self, rotation: Rotation) -> Self {
        let map = rotation_map(rotation, self.width, self.height);
        let (width, height) = (self.height, self.width);
        Self {
            width,
            height,
            ..self.apply(map)
        }
    }

    fn crop(self, rect: CropRect) -> AugResult<Self> {
        rect.check_within(self.width, self.height)?;
        let out = self.apply(PixelMap::Shift(f64::from(rect.x), f64::from(rect.y)));
        Ok(Self {
            width: rect.width,
            height: rect.height,
            ..out
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/targets/matrices.rs"]
mod tests;
