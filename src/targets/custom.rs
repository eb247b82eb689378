use crate::foundation::error::AugResult;
use crate::targets::augmentable::{Augmentable, CropRect, Rotation};
use std::any::Any;
use std::fmt;

// Object-safe mirror of `Augmentable` for any cloneable, comparable target.
trait ErasedTarget: Send + Sync + fmt::Debug {
    fn frame(&self) -> AugResult<(u32, u32)>;
    fn flipped_horizontal(self: Box<Self>) -> Box<dyn ErasedTarget>;
    fn flipped_vertical(self: Box<Self>) -> Box<dyn ErasedTarget>;
    fn rotated(self: Box<Self>, rotation: Rotation) -> Box<dyn ErasedTarget>;
    fn cropped(self: Box<Self>, rect: CropRect) -> AugResult<Box<dyn ErasedTarget>>;
    fn brightened(self: Box<Self>, delta: i32) -> Box<dyn ErasedTarget>;
    fn contrasted(self: Box<Self>, factor: f32) -> Box<dyn ErasedTarget>;
    fn blurred(self: Box<Self>, sigma: f32) -> Box<dyn ErasedTarget>;
    fn clone_boxed(&self) -> Box<dyn ErasedTarget>;
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn ErasedTarget) -> bool;
}

impl<T> ErasedTarget for T
where
    T: Augmentable + Clone + PartialEq + fmt::Debug + Sync + 'static,
{
    fn frame(&self) -> AugResult<(u32, u32)> {
        Augmentable::dimensions(self)
    }

    fn flipped_horizontal(self: Box<Self>) -> Box<dyn ErasedTarget> {
        Box::new(Augmentable::flip_horizontal(*self))
    }

    fn flipped_vertical(self: Box<Self>) -> Box<dyn ErasedTarget> {
        Box::new(Augmentable::flip_vertical(*self))
    }

    fn rotated(self: Box<Self>, rotation: Rotation) -> Box<dyn ErasedTarget> {
        Box::new(Augmentable::rotate90(*self, rotation))
    }

    fn cropped(self: Box<Self>, rect: CropRect) -> AugResult<Box<dyn ErasedTarget>> {
        Ok(Box::new(Augmentable::crop(*self, rect)?))
    }

    fn brightened(self: Box<Self>, delta: i32) -> Box<dyn ErasedTarget> {
        Box::new(Augmentable::brighten(*self, delta))
    }

    fn contrasted(self: Box<Self>, factor: f32) -> Box<dyn ErasedTarget> {
        Box::new(Augmentable::contrast(*self, factor))
    }

    fn blurred(self: Box<Self>, sigma: f32) -> Box<dyn ErasedTarget> {
        Box::new(Augmentable::blur(*self, sigma))
    }

    fn clone_boxed(&self) -> Box<dyn ErasedTarget> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedTarget) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// A user-defined [`Augmentable`] carried inside a [`Target`](crate::Target) bundle.
///
/// Bundles hold any number of these next to the built-in members; every
/// operation is forwarded to the wrapped value's own implementation.
pub struct CustomTarget(Box<dyn ErasedTarget>);

impl CustomTarget {
    /// Wrap `value`.
    pub fn new<T>(value: T) -> Self
    where
        T: Augmentable + Clone + PartialEq + fmt::Debug + Sync + 'static,
    {
        Self(Box::new(value))
    }

    /// The wrapped value, if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Clone for CustomTarget {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for CustomTarget {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_erased(other.0.as_ref())
    }
}

impl fmt::Debug for CustomTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomTarget").field(&self.0).finish()
    }
}

impl Augmentable for CustomTarget {
    fn dimensions(&self) -> AugResult<(u32, u32)> {
        self.0.frame()
    }

    fn flip_horizontal(self) -> Self {
        Self(self.0.flipped_horizontal())
    }

    fn flip_vertical(self) -> Self {
        Self(self.0.flipped_vertical())
    }

    fn rotate90(self, rotation: Rotation) -> Self {
        Self(self.0.rotated(rotation))
    }

    fn crop(self, rect: CropRect) -> AugResult<Self> {
        Ok(Self(self.0.cropped(rect)?))
    }

    fn brighten(self, delta: i32) -> Self {
        Self(self.0.brightened(delta))
    }

    fn contrast(self, factor: f32) -> Self {
        Self(self.0.contrasted(factor))
    }

    fn blur(self, sigma: f32) -> Self {
        Self(self.0.blurred(sigma))
    }
}
