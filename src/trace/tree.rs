use crate::foundation::error::{AugError, AugResult};
use crate::trace::fingerprint::{TraceFingerprint, fingerprint_trace};
use crate::trace::record::ParameterRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One executed node of a pipeline invocation.
///
/// The tree mirrors the combinator tree that actually ran: branches that were
/// not taken have no node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceNode {
    pub(crate) kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    pub(crate) branch: u32,
    #[serde(default, skip_serializing_if = "ParameterRecord::is_empty")]
    pub(crate) record: ParameterRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<TraceNode>,
}

impl TraceNode {
    /// Create a node with an empty record and no children.
    pub fn new(kind: impl Into<String>, branch: u32) -> Self {
        Self {
            kind: kind.into(),
            label: None,
            branch,
            record: ParameterRecord::new(),
            children: Vec::new(),
        }
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace the parameter record.
    pub fn with_record(mut self, record: ParameterRecord) -> Self {
        self.record = record;
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: TraceNode) -> Self {
        self.children.push(child);
        self
    }

    /// Transform kind that produced this node (`sequential`, `flip_horizontal`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Optional user label of the pipeline node.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Position of this node relative to its parent.
    pub fn branch(&self) -> u32 {
        self.branch
    }

    /// Values sampled by this node.
    pub fn record(&self) -> &ParameterRecord {
        &self.record
    }

    /// Executed children in execution order.
    pub fn children(&self) -> &[TraceNode] {
        &self.children
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TraceNode::node_count).sum::<usize>()
    }

    /// Kinds of all nodes in this subtree, pre-order.
    pub fn kinds(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.node_count());
        collect_kinds(self, &mut out);
        out
    }
}

fn collect_kinds<'a>(node: &'a TraceNode, out: &mut Vec<&'a str>) {
    out.push(&node.kind);
    for child in &node.children {
        collect_kinds(child, out);
    }
}

/// Complete record of one pipeline invocation.
///
/// Replaying a trace against the same pipeline and input image reproduces the
/// output exactly, without touching a random source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trace {
    seed: u64,
    root: TraceNode,
}

impl Trace {
    /// Assemble a trace from a root node.
    pub fn new(seed: u64, root: TraceNode) -> Self {
        Self { seed, root }
    }

    /// Seed the invocation ran with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Root node (the pipeline root).
    pub fn root(&self) -> &TraceNode {
        &self.root
    }

    /// Total number of executed nodes.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Stable 128-bit digest of structure and recorded values.
    pub fn fingerprint(&self) -> TraceFingerprint {
        fingerprint_trace(self)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> AugResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AugError::serde(format!("serialize trace JSON: {e}")))
    }

    /// Parse a trace from a JSON string.
    pub fn from_json(s: &str) -> AugResult<Self> {
        serde_json::from_str(s).map_err(|e| AugError::serde(format!("parse trace JSON: {e}")))
    }

    /// Parse a trace from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AugResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AugError::serde(format!("open trace JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| AugError::serde(format!("parse trace JSON '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/tree.rs"]
mod tests;
