use crate::foundation::error::AugResult;
use crate::foundation::ids::NodeIdx;
use crate::pipeline::ir::{NodeKindIR, Pipeline};
use crate::pipeline::node::Count;
use crate::random::context::RandomContext;
use crate::random::sampler::{sample_bernoulli, sample_choice, sample_int};

/// Evaluate node `idx` on `image` as child position `branch` of its parent.
///
/// Sequential children share the parent's stream. Branching combinators run
/// each selected child on `ctx.fork(branch)` so the parent stream is never
/// advanced by a child.
pub(crate) fn eval_node<I>(
    pipeline: &Pipeline<I>,
    idx: NodeIdx,
    image: I,
    ctx: &mut RandomContext,
    branch: u32,
) -> AugResult<I> {
    let node = pipeline.node(idx);
    ctx.enter(node.kind_name(), node.label.as_deref(), branch)?;

    let out = match &node.kind {
        NodeKindIR::Leaf(t) => t.apply(image, ctx)?,
        NodeKindIR::Identity => image,
        NodeKindIR::Sequential { children } => {
            let mut image = image;
            for (i, child) in children.iter().enumerate() {
                image = eval_node(pipeline, *child, image, ctx, i as u32)?;
            }
            image
        }
        NodeKindIR::Sometimes { p, child } => {
            let applied = sample_bernoulli(ctx, "applied", *p)?;
            tracing::debug!(node = idx.0, applied, "sometimes");
            if applied {
                eval_forked(pipeline, *child, image, ctx, 0)?
            } else {
                image
            }
        }
        NodeKindIR::OneOf { children, weights } => {
            let index = sample_choice(ctx, "index", weights)?;
            tracing::debug!(node = idx.0, index, "one_of");
            eval_forked(pipeline, children[index], image, ctx, index as u32)?
        }
        NodeKindIR::SomeOf {
            children,
            weights,
            count,
            replace,
        } => {
            let k = match *count {
                Count::Exact(k) => k,
                Count::Range { min, max } => {
                    sample_int(ctx, "k", i64::from(min), i64::from(max))? as u32
                }
            };
            let mut remaining = weights.clone();
            let mut image = image;
            for slot in 0..k {
                let pick = sample_choice(ctx, "pick", &remaining)?;
                tracing::debug!(node = idx.0, slot, pick, "some_of");
                if !replace {
                    remaining[pick] = 0.0;
                }
                image = eval_forked(pipeline, children[pick], image, ctx, slot)?;
            }
            image
        }
    };

    let record = ctx.exit()?;
    if matches!(node.kind, NodeKindIR::Leaf(_)) {
        tracing::trace!(node = idx.0, kind = node.kind_name(), ?record, "leaf applied");
    }
    Ok(out)
}

fn eval_forked<I>(
    pipeline: &Pipeline<I>,
    idx: NodeIdx,
    image: I,
    ctx: &mut RandomContext,
    branch: u32,
) -> AugResult<I> {
    let mut child = ctx.fork(branch)?;
    let out = eval_node(pipeline, idx, image, &mut child, branch)?;
    ctx.join(child)?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/engine.rs"]
mod tests;
