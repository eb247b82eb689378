use crate::foundation::error::{AugError, AugResult};
use crate::random::fork::fork_rng;
use crate::trace::record::{ParamValue, ParameterRecord};
use crate::trace::tree::{Trace, TraceNode};
use anyhow::anyhow;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lifecycle of a [`RandomContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPhase {
    /// Created, nothing entered or drawn yet.
    Fresh,
    /// At least one node entered.
    Active,
    /// Closed; no further draws, nodes or forks are accepted.
    Exhausted,
}

/// Random state threaded through one pipeline invocation.
///
/// A context is either *live* (backed by a seeded ChaCha stream) or *replay*
/// (backed by a recorded [`Trace`]). In both modes it doubles as the trace
/// recorder: the engine brackets every node with [`RandomContext::enter`] and
/// [`RandomContext::exit`], sampler calls log into the innermost open node, and
/// nodes are attached to their parent on exit. In replay mode the same calls
/// walk the recorded tree instead and hand back recorded values, so leaf code
/// is identical in both modes.
#[derive(Debug)]
pub struct RandomContext {
    source: Source,
    stack: Vec<Frame>,
    finished: Option<TraceNode>,
    phase: ContextPhase,
}

#[derive(Debug)]
enum Source {
    Live(ChaCha8Rng),
    Replay { pending_root: Option<TraceNode> },
}

#[derive(Debug)]
struct Frame {
    node: TraceNode,
    next_value: usize,
    // Replay only: recorded children not yet entered or forked.
    pending: std::vec::IntoIter<TraceNode>,
}

impl Frame {
    fn new(node: TraceNode, pending: Vec<TraceNode>) -> Self {
        Self {
            node,
            next_value: 0,
            pending: pending.into_iter(),
        }
    }
}

impl RandomContext {
    /// Live context seeded deterministically from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::live(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Replay context that serves the values recorded in `trace`.
    pub fn from_trace(trace: &Trace) -> Self {
        Self::replay(trace.root().clone())
    }

    fn live(rng: ChaCha8Rng) -> Self {
        Self {
            source: Source::Live(rng),
            stack: Vec::new(),
            finished: None,
            phase: ContextPhase::Fresh,
        }
    }

    fn replay(root: TraceNode) -> Self {
        Self {
            source: Source::Replay {
                pending_root: Some(root),
            },
            stack: Vec::new(),
            finished: None,
            phase: ContextPhase::Fresh,
        }
    }

    /// `true` when values come from a recorded trace.
    pub fn is_replay(&self) -> bool {
        matches!(self.source, Source::Replay { .. })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ContextPhase {
        self.phase
    }

    /// Number of nodes currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn ensure_open(&self) -> AugResult<()> {
        if self.phase == ContextPhase::Exhausted {
            return Err(AugError::Other(anyhow!("random context is exhausted")));
        }
        Ok(())
    }

    /// Open a trace node for `kind` at position `branch` of its parent.
    ///
    /// In replay mode the next recorded node is taken instead and must match
    /// `kind` and `branch`.
    pub fn enter(&mut self, kind: &str, label: Option<&str>, branch: u32) -> AugResult<()> {
        self.ensure_open()?;
        self.phase = ContextPhase::Active;

        let frame = match &mut self.source {
            Source::Live(_) => {
                if self.stack.is_empty() && self.finished.is_some() {
                    return Err(AugError::Other(anyhow!(
                        "random context already recorded a root node"
                    )));
                }
                let mut node = TraceNode::new(kind, branch);
                node.label = label.map(str::to_owned);
                Frame::new(node, Vec::new())
            }
            Source::Replay { pending_root } => {
                let recorded = match self.stack.last_mut() {
                    Some(parent) => parent.pending.next().ok_or_else(|| {
                        AugError::trace_exhausted(format!(
                            "'{}' recorded no further child for '{kind}'",
                            parent.node.kind
                        ))
                    })?,
                    None => pending_root.take().ok_or_else(|| {
                        AugError::trace_exhausted(format!("no recorded node left for '{kind}'"))
                    })?,
                };
                check_node(&recorded, kind, branch)?;
                let mut node = recorded;
                let pending = std::mem::take(&mut node.children);
                Frame::new(node, pending)
            }
        };
        self.stack.push(frame);
        Ok(())
    }

    /// Close the innermost node and return its parameter record.
    ///
    /// In replay mode every recorded value and child of the node must have been
    /// consumed.
    pub fn exit(&mut self) -> AugResult<ParameterRecord> {
        self.ensure_open()?;
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| AugError::Other(anyhow!("exit without a matching enter")))?;

        if self.is_replay() {
            let unused_values = frame.node.record.len() - frame.next_value;
            if unused_values > 0 {
                return Err(AugError::trace_mismatch(format!(
                    "'{}' left {unused_values} recorded value(s) unused",
                    frame.node.kind
                )));
            }
            let unused_children = frame.pending.len();
            if unused_children > 0 {
                return Err(AugError::trace_mismatch(format!(
                    "'{}' left {unused_children} recorded child node(s) unused",
                    frame.node.kind
                )));
            }
        }

        let record = frame.node.record.clone();
        self.attach(frame.node);
        Ok(record)
    }

    fn attach(&mut self, node: TraceNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.node.children.push(node),
            None => self.finished = Some(node),
        }
    }

    /// Derive an independent context for child position `branch`.
    ///
    /// Live: the child stream is a pure function of this context's current
    /// generator state and `branch`; this context's own stream is not
    /// advanced. Replay: the next recorded child subtree is handed over and
    /// must carry the same `branch`.
    pub fn fork(&mut self, branch: u32) -> AugResult<RandomContext> {
        self.ensure_open()?;
        match &self.source {
            Source::Live(rng) => Ok(Self::live(fork_rng(rng, branch))),
            Source::Replay { .. } => {
                let parent = self
                    .stack
                    .last_mut()
                    .ok_or_else(|| AugError::Other(anyhow!("fork outside of an entered node")))?;
                let recorded = parent.pending.next().ok_or_else(|| {
                    AugError::trace_exhausted(format!(
                        "'{}' recorded no child for branch {branch}",
                        parent.node.kind
                    ))
                })?;
                if recorded.branch != branch {
                    return Err(AugError::trace_mismatch(format!(
                        "'{}' expected branch {branch} but trace recorded branch {}",
                        parent.node.kind, recorded.branch
                    )));
                }
                Ok(Self::replay(recorded))
            }
        }
    }

    /// Close a forked child and attach its subtree to the innermost open node.
    pub fn join(&mut self, mut child: RandomContext) -> AugResult<()> {
        self.ensure_open()?;
        if self.stack.is_empty() {
            return Err(AugError::Other(anyhow!("join outside of an entered node")));
        }
        let node = child.close()?;
        self.attach(node);
        Ok(())
    }

    /// Finish the context and return the recorded root node.
    ///
    /// Afterwards the context is [`ContextPhase::Exhausted`].
    pub fn close(&mut self) -> AugResult<TraceNode> {
        self.ensure_open()?;
        if let Some(open) = self.stack.last() {
            return Err(AugError::Other(anyhow!(
                "random context closed while '{}' is still open",
                open.node.kind
            )));
        }
        if let Source::Replay {
            pending_root: Some(root),
        } = &self.source
        {
            return Err(AugError::trace_mismatch(format!(
                "recorded node '{}' was never replayed",
                root.kind
            )));
        }
        self.phase = ContextPhase::Exhausted;
        self.finished
            .take()
            .ok_or_else(|| AugError::Other(anyhow!("random context recorded no node")))
    }

    /// Draw one unit of randomness and log it as `name` on the innermost node.
    ///
    /// `sample` maps the raw 64 random bits to the recorded value. In replay
    /// mode `sample` is not called; the next recorded value is returned after
    /// checking its name and `type_name`.
    pub(crate) fn draw(
        &mut self,
        name: &str,
        type_name: &'static str,
        sample: impl FnOnce(u64) -> ParamValue,
    ) -> AugResult<ParamValue> {
        self.ensure_open()?;
        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| AugError::Other(anyhow!("draw '{name}' outside of an entered node")))?;

        match &mut self.source {
            Source::Live(rng) => {
                let value = sample(rng.next_u64());
                frame.node.record.push(name, value);
                Ok(value)
            }
            Source::Replay { .. } => {
                let entry = frame
                    .node
                    .record
                    .entries()
                    .get(frame.next_value)
                    .ok_or_else(|| {
                        AugError::trace_exhausted(format!(
                            "'{}' requested draw '{name}' beyond its {} recorded value(s)",
                            frame.node.kind,
                            frame.node.record.len()
                        ))
                    })?;
                if entry.name != name || entry.value.type_name() != type_name {
                    return Err(AugError::trace_mismatch(format!(
                        "'{}' expected {type_name} '{name}' but trace recorded {} '{}'",
                        frame.node.kind,
                        entry.value.type_name(),
                        entry.name
                    )));
                }
                let value = entry.value;
                frame.next_value += 1;
                Ok(value)
            }
        }
    }
}

fn check_node(recorded: &TraceNode, kind: &str, branch: u32) -> AugResult<()> {
    if recorded.kind != kind {
        return Err(AugError::trace_mismatch(format!(
            "expected node '{kind}' but trace recorded '{}'",
            recorded.kind
        )));
    }
    if recorded.branch != branch {
        return Err(AugError::trace_mismatch(format!(
            "node '{kind}' expected branch {branch} but trace recorded branch {}",
            recorded.branch
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/random/context.rs"]
mod tests;
