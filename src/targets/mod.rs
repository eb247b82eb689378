pub(crate) mod augmentable;
pub(crate) mod custom;
pub(crate) mod keypoints;
pub(crate) mod matrices;
#[allow(clippy::module_inception)]
pub(crate) mod targets;
