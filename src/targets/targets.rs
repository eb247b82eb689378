use crate::foundation::error::{AugError, AugResult};
use crate::targets::augmentable::{Augmentable, CropRect, Rotation};
use crate::targets::custom::CustomTarget;
use crate::targets::keypoints::Keypoints;
use crate::targets::matrices::{CameraMatrix, Matrices2D};
use image::{GrayImage, RgbaImage};
use std::collections::BTreeMap;

/// One member of a [`Targets`] bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Colour image; receives geometric and photometric operations.
    Image(RgbaImage),
    /// Spatial map (segmentation mask, depth); geometric operations only.
    Mask(GrayImage),
    /// Point annotations; geometric operations only.
    Keypoints(Keypoints),
    /// Camera intrinsics of the frame.
    CameraMatrix(CameraMatrix),
    /// Per-item 2D transforms into the frame.
    Matrices2D(Matrices2D),
    /// Arbitrary payload with no spatial frame; every operation passes it through.
    Data(serde_json::Value),
    /// User-defined target.
    Custom(CustomTarget),
}

macro_rules! geometric {
    ($target:expr, $t:ident => $op:expr) => {
        match $target {
            Target::Image($t) => Target::Image($op),
            Target::Mask($t) => Target::Mask($op),
            Target::Keypoints($t) => Target::Keypoints($op),
            Target::CameraMatrix($t) => Target::CameraMatrix($op),
            Target::Matrices2D($t) => Target::Matrices2D($op),
            Target::Custom($t) => Target::Custom($op),
            data @ Target::Data(_) => data,
        }
    };
}

impl Target {
    /// Wrap a user-defined target.
    pub fn custom<T>(value: T) -> Self
    where
        T: Augmentable + Clone + PartialEq + std::fmt::Debug + Sync + 'static,
    {
        Self::Custom(CustomTarget::new(value))
    }

    /// `(width, height)` of the member's frame, `None` for [`Target::Data`].
    pub fn frame(&self) -> AugResult<Option<(u32, u32)>> {
        Ok(match self {
            Self::Image(img) => Some(img.dimensions()),
            Self::Mask(mask) => Some(mask.dimensions()),
            Self::Keypoints(kp) => Some((kp.width, kp.height)),
            Self::CameraMatrix(k) => Some((k.width, k.height)),
            Self::Matrices2D(m) => Some((m.width, m.height)),
            Self::Custom(c) => Some(c.dimensions()?),
            Self::Data(_) => None,
        })
    }
}

impl Augmentable for Target {
    fn dimensions(&self) -> AugResult<(u32, u32)> {
        self.frame()?
            .ok_or_else(|| AugError::shape_mismatch("data target has no spatial frame"))
    }

    fn flip_horizontal(self) -> Self {
        geometric!(self, t => t.flip_horizontal())
    }

    fn flip_vertical(self) -> Self {
        geometric!(self, t => t.flip_vertical())
    }

    fn rotate90(self, rotation: Rotation) -> Self {
        geometric!(self, t => t.rotate90(rotation))
    }

    fn crop(self, rect: CropRect) -> AugResult<Self> {
        Ok(geometric!(self, t => t.crop(rect)?))
    }

    fn brighten(self, delta: i32) -> Self {
        match self {
            Self::Image(img) => Self::Image(img.brighten(delta)),
            Self::Custom(c) => Self::Custom(c.brighten(delta)),
            other => other,
        }
    }

    fn contrast(self, factor: f32) -> Self {
        match self {
            Self::Image(img) => Self::Image(Augmentable::contrast(img, factor)),
            Self::Custom(c) => Self::Custom(Augmentable::contrast(c, factor)),
            other => other,
        }
    }

    fn blur(self, sigma: f32) -> Self {
        match self {
            Self::Image(img) => Self::Image(img.blur(sigma)),
            Self::Custom(c) => Self::Custom(c.blur(sigma)),
            other => other,
        }
    }
}

/// Named bundle of targets that receive the same sampled operation.
///
/// All members with a frame share it; adding a member of a different size
/// fails with [`AugError::ShapeMismatch`]. [`Target::Data`] members have no
/// frame and are carried along unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Targets {
    members: BTreeMap<String, Target>,
}

impl Targets {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace member `name`.
    pub fn insert(&mut self, name: impl Into<String>, target: Target) -> AugResult<()> {
        let name = name.into();
        if let Some(size) = target.frame()? {
            for (other, existing) in self.members.iter().filter(|(k, _)| **k != name) {
                if let Some(expected) = existing.frame()?
                    && expected != size
                {
                    return Err(AugError::shape_mismatch(format!(
                        "target '{name}' is {}x{} but '{other}' is {}x{}",
                        size.0, size.1, expected.0, expected.1
                    )));
                }
            }
        }
        self.members.insert(name, target);
        Ok(())
    }

    /// Builder form of [`Targets::insert`].
    pub fn with(mut self, name: impl Into<String>, target: Target) -> AugResult<Self> {
        self.insert(name, target)?;
        Ok(self)
    }

    /// Member `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.members.get(name)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `true` when the bundle has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Image members by name.
    pub fn images(&self) -> BTreeMap<&str, &RgbaImage> {
        self.members
            .iter()
            .filter_map(|(k, t)| match t {
                Target::Image(img) => Some((k.as_str(), img)),
                _ => None,
            })
            .collect()
    }

    /// Mask members by name.
    pub fn masks(&self) -> BTreeMap<&str, &GrayImage> {
        self.members
            .iter()
            .filter_map(|(k, t)| match t {
                Target::Mask(mask) => Some((k.as_str(), mask)),
                _ => None,
            })
            .collect()
    }

    /// Keypoint members by name.
    pub fn keypoints(&self) -> BTreeMap<&str, &Keypoints> {
        self.members
            .iter()
            .filter_map(|(k, t)| match t {
                Target::Keypoints(kp) => Some((k.as_str(), kp)),
                _ => None,
            })
            .collect()
    }

    /// Camera-matrix members by name.
    pub fn camera_matrices(&self) -> BTreeMap<&str, &CameraMatrix> {
        self.members
            .iter()
            .filter_map(|(k, t)| match t {
                Target::CameraMatrix(cam) => Some((k.as_str(), cam)),
                _ => None,
            })
            .collect()
    }

    /// Consume the bundle into its members.
    pub fn into_members(self) -> BTreeMap<String, Target> {
        self.members
    }

    fn map(self, f: impl Fn(Target) -> Target) -> Self {
        Self {
            members: self.members.into_iter().map(|(k, t)| (k, f(t))).collect(),
        }
    }

    fn try_map(self, f: impl Fn(Target) -> AugResult<Target>) -> AugResult<Self> {
        let members = self
            .members
            .into_iter()
            .map(|(k, t)| Ok((k, f(t)?)))
            .collect::<AugResult<_>>()?;
        Ok(Self { members })
    }
}

impl Augmentable for Targets {
    fn dimensions(&self) -> AugResult<(u32, u32)> {
        for target in self.members.values() {
            if let Some(size) = target.frame()? {
                return Ok(size);
            }
        }
        Err(AugError::shape_mismatch("target bundle has no spatial member"))
    }

    fn flip_horizontal(self) -> Self {
        self.map(Target::flip_horizontal)
    }

    fn flip_vertical(self) -> Self {
        self.map(Target::flip_vertical)
    }

    fn rotate90(self, rotation: Rotation) -> Self {
        self.map(|t| t.rotate90(rotation))
    }

    fn crop(self, rect: CropRect) -> AugResult<Self> {
        self.try_map(|t| t.crop(rect))
    }

    fn brighten(self, delta: i32) -> Self {
        self.map(|t| t.brighten(delta))
    }

    fn contrast(self, factor: f32) -> Self {
        self.map(|t| Augmentable::contrast(t, factor))
    }

    fn blur(self, sigma: f32) -> Self {
        self.map(|t| t.blur(sigma))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/targets/targets.rs"]
mod tests;
