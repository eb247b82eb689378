use crate::foundation::error::{AugError, AugResult};
use crate::pipeline::engine::eval_node;
use crate::pipeline::ir::Pipeline;
use crate::random::context::RandomContext;
use crate::random::fork::derive_item_seed;
use crate::trace::tree::Trace;
use rand::Rng;
use rayon::prelude::*;

/// Output of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput<I> {
    /// Transformed image.
    pub image: I,
    /// Every decision and sampled value of the invocation.
    pub trace: Trace,
}

/// Options for [`run_batch`].
#[derive(Clone, Debug)]
pub struct BatchOpts {
    /// Seed from which per-item seeds are derived. `None` draws one from the
    /// process random source.
    pub base_seed: Option<u64>,
    /// Run items on a dedicated rayon thread pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            base_seed: None,
            parallel: true,
            threads: None,
        }
    }
}

/// Run `pipeline` on `image`.
///
/// With `seed == None` a seed is drawn from the process random source; the
/// effective seed is stored in the returned trace. On error no partial image
/// or trace is returned.
#[tracing::instrument(skip(pipeline, image))]
pub fn run<I>(pipeline: &Pipeline<I>, image: I, seed: Option<u64>) -> AugResult<RunOutput<I>> {
    let seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
    let mut ctx = RandomContext::from_seed(seed);
    let image = eval_node(pipeline, pipeline.root(), image, &mut ctx, 0)?;
    let root = ctx.close()?;
    tracing::debug!(seed, nodes = root.node_count(), "pipeline run finished");
    Ok(RunOutput {
        image,
        trace: Trace::new(seed, root),
    })
}

/// Re-run `pipeline` on `image` with every decision taken from `trace`.
///
/// Fails with [`AugError::TraceExhausted`] or [`AugError::TraceMismatch`] when
/// the trace was not recorded by a pipeline of the same shape.
#[tracing::instrument(skip(pipeline, image, trace), fields(seed = trace.seed()))]
pub fn replay<I>(pipeline: &Pipeline<I>, image: I, trace: &Trace) -> AugResult<I> {
    let mut ctx = RandomContext::from_trace(trace);
    let image = eval_node(pipeline, pipeline.root(), image, &mut ctx, 0)?;
    ctx.close()?;
    Ok(image)
}

/// Run `pipeline` independently on every image of `images`.
///
/// Item `i` is seeded with [`derive_item_seed`]`(base_seed, i)`, so the
/// results do not depend on `parallel` or the thread count. Output order
/// matches input order; the first error aborts the batch.
#[tracing::instrument(skip(pipeline, images), fields(items = images.len()))]
pub fn run_batch<I: Send>(
    pipeline: &Pipeline<I>,
    images: Vec<I>,
    opts: &BatchOpts,
) -> AugResult<Vec<RunOutput<I>>> {
    let base_seed = opts
        .base_seed
        .unwrap_or_else(|| rand::rng().random::<u64>());
    let run_item = |(i, image): (usize, I)| {
        run(pipeline, image, Some(derive_item_seed(base_seed, i as u64)))
    };

    if !opts.parallel {
        return images.into_iter().enumerate().map(run_item).collect();
    }
    let pool = build_thread_pool(opts.threads)?;
    pool.install(|| images.into_par_iter().enumerate().map(run_item).collect())
}

fn build_thread_pool(threads: Option<usize>) -> AugResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(AugError::invalid_configuration(
            "run_batch 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        AugError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/invoke.rs"]
mod tests;
