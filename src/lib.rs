//! Countless is a deterministic, replayable image-augmentation pipeline engine.
//!
//! A pipeline is a tree of combinators (`sequential`, `sometimes`, `one_of`,
//! `some_of`, `identity`) over leaf [`Transform`]s:
//!
//! - Assemble a [`Node`] tree, or load a [`PipelineConfig`] and resolve it
//!   through a [`Registry`]
//! - Validate and freeze it into a [`Pipeline`]
//! - [`run`] it with an optional seed to get the output and a [`Trace`] of
//!   every decision, then [`replay`] the trace to reproduce the output exactly
//!
//! All randomness flows through an explicit [`RandomContext`]; there is no
//! hidden global state inside the engine.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod leaves;
mod pipeline;
mod random;
mod targets;
mod trace;
mod transform;

pub use crate::foundation::error::{AugError, AugResult};
pub use crate::foundation::ids::NodeIdx;

pub use crate::random::context::{ContextPhase, RandomContext};
pub use crate::random::distribution::Distribution;
pub use crate::random::fork::derive_item_seed;
pub use crate::random::sampler::{sample_bernoulli, sample_choice, sample_int, sample_uniform};

pub use crate::trace::fingerprint::TraceFingerprint;
pub use crate::trace::record::{ParamEntry, ParamValue, ParameterRecord};
pub use crate::trace::tree::{Trace, TraceNode};

pub use crate::transform::core::{FnTransform, Transform, apply_traced};

pub use crate::pipeline::invoke::{BatchOpts, RunOutput, replay, run, run_batch};
pub use crate::pipeline::ir::Pipeline;
pub use crate::pipeline::node::{Count, Node};

pub use crate::config::model::{NodeDef, PipelineConfig};
pub use crate::config::registry::{RESERVED_KINDS, Registry, parse_params};

pub use crate::targets::augmentable::{Augmentable, CropRect, Rotation};
pub use crate::targets::custom::CustomTarget;
pub use crate::targets::keypoints::Keypoints;
pub use crate::targets::matrices::{CameraMatrix, Mat3, Matrices2D};
pub use crate::targets::targets::{Target, Targets};

pub use crate::leaves::geometric::{FlipHorizontal, FlipVertical, RandomCrop, Rotate90};
pub use crate::leaves::photometric::{Brightness, Contrast, GaussianBlur};
