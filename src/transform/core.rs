use crate::foundation::error::AugResult;
use crate::random::context::RandomContext;
use crate::trace::record::ParameterRecord;
use std::fmt;

/// The atomic unit of a pipeline.
///
/// A transform takes an image-like value and the invocation's
/// [`RandomContext`] and returns the transformed value. Every random choice
/// must go through the sampler functions ([`crate::sample_uniform`] and
/// friends) so it is recorded and can be replayed; no other hidden state may
/// influence the output. Configuration lives in the (immutable) instance.
///
/// Constraints on the input (size, channel count) are the transform's own
/// concern and are reported as [`crate::AugError::ShapeMismatch`].
pub trait Transform<I>: Send + Sync + fmt::Debug {
    /// Kind name recorded in traces, e.g. `flip_horizontal`.
    fn name(&self) -> &str;

    /// Transform `image`, drawing any parameters from `ctx`.
    fn apply(&self, image: I, ctx: &mut RandomContext) -> AugResult<I>;
}

/// Run `transform` as one trace node and return the output together with the
/// parameters it sampled.
pub fn apply_traced<I, T>(
    transform: &T,
    image: I,
    ctx: &mut RandomContext,
    label: Option<&str>,
    branch: u32,
) -> AugResult<(I, ParameterRecord)>
where
    T: Transform<I> + ?Sized,
{
    ctx.enter(transform.name(), label, branch)?;
    let out = transform.apply(image, ctx)?;
    let record = ctx.exit()?;
    Ok((out, record))
}

/// Leaf transform backed by a closure.
pub struct FnTransform<F> {
    name: String,
    f: F,
}

impl<F> FnTransform<F> {
    /// Wrap `f` under kind name `name`.
    pub fn new<I>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(I, &mut RandomContext) -> AugResult<I> + Send + Sync,
    {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<I, F> Transform<I> for FnTransform<F>
where
    F: Fn(I, &mut RandomContext) -> AugResult<I> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: I, ctx: &mut RandomContext) -> AugResult<I> {
        (self.f)(image, ctx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/core.rs"]
mod tests;
