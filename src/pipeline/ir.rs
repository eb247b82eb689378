use crate::foundation::ids::NodeIdx;
use crate::pipeline::node::Count;
use crate::transform::core::Transform;
use std::fmt;

/// Immutable, validated combinator tree.
///
/// Nodes live in an arena and refer to their children by [`NodeIdx`]; indices
/// are assigned in DFS pre-order. A pipeline is read-only after construction
/// and can be shared by reference across threads.
pub struct Pipeline<I> {
    pub(crate) nodes: Vec<NodeIR<I>>,
    pub(crate) root: NodeIdx,
}

pub(crate) struct NodeIR<I> {
    pub(crate) label: Option<String>,
    pub(crate) kind: NodeKindIR<I>,
}

pub(crate) enum NodeKindIR<I> {
    Leaf(Box<dyn Transform<I>>),
    Identity,
    Sequential {
        children: Vec<NodeIdx>,
    },
    Sometimes {
        p: f64,
        child: NodeIdx,
    },
    OneOf {
        children: Vec<NodeIdx>,
        weights: Vec<f64>,
    },
    SomeOf {
        children: Vec<NodeIdx>,
        weights: Vec<f64>,
        count: Count,
        replace: bool,
    },
}

impl<I> NodeIR<I> {
    pub(crate) fn kind_name(&self) -> &str {
        match &self.kind {
            NodeKindIR::Leaf(t) => t.name(),
            NodeKindIR::Identity => "identity",
            NodeKindIR::Sequential { .. } => "sequential",
            NodeKindIR::Sometimes { .. } => "sometimes",
            NodeKindIR::OneOf { .. } => "one_of",
            NodeKindIR::SomeOf { .. } => "some_of",
        }
    }

    pub(crate) fn children(&self) -> &[NodeIdx] {
        match &self.kind {
            NodeKindIR::Leaf(_) | NodeKindIR::Identity => &[],
            NodeKindIR::Sometimes { child, .. } => std::slice::from_ref(child),
            NodeKindIR::Sequential { children }
            | NodeKindIR::OneOf { children, .. }
            | NodeKindIR::SomeOf { children, .. } => children,
        }
    }
}

impl<I> Pipeline<I> {
    /// Root node index (always `NodeIdx(0)`).
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Kind name of node `idx`, if it exists.
    pub fn kind_of(&self, idx: NodeIdx) -> Option<&str> {
        self.nodes.get(idx.index()).map(NodeIR::kind_name)
    }

    /// Label of node `idx`, if it exists and has one.
    pub fn label_of(&self, idx: NodeIdx) -> Option<&str> {
        self.nodes.get(idx.index()).and_then(|n| n.label.as_deref())
    }

    /// Child indices of node `idx` in declared order.
    pub fn children_of(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.nodes
            .get(idx.index())
            .map(NodeIR::children)
            .unwrap_or(&[])
    }

    /// Kind names of all nodes in arena (pre-order) order.
    pub fn kinds(&self) -> Vec<&str> {
        self.nodes.iter().map(NodeIR::kind_name).collect()
    }

    pub(crate) fn node(&self, idx: NodeIdx) -> &NodeIR<I> {
        &self.nodes[idx.index()]
    }
}

impl<I> fmt::Debug for Pipeline<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("root", &self.root)
            .field("kinds", &self.kinds())
            .finish()
    }
}
