use crate::transform::core::Transform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// How many children a `some_of` node applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CountRepr", into = "CountRepr")]
pub enum Count {
    /// Always exactly `k` children.
    Exact(u32),
    /// `k` drawn uniformly from `[min, max]` (one `k` draw per invocation).
    Range {
        /// Smallest count, inclusive.
        min: u32,
        /// Largest count, inclusive.
        max: u32,
    },
}

impl Count {
    /// Largest number of children this count can ask for.
    pub fn max(self) -> u32 {
        match self {
            Self::Exact(k) => k,
            Self::Range { max, .. } => max,
        }
    }
}

impl From<u32> for Count {
    fn from(k: u32) -> Self {
        Self::Exact(k)
    }
}

impl From<RangeInclusive<u32>> for Count {
    fn from(r: RangeInclusive<u32>) -> Self {
        Self::Range {
            min: *r.start(),
            max: *r.end(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CountRepr {
    Exact(u32),
    Range([u32; 2]),
}

impl From<CountRepr> for Count {
    fn from(r: CountRepr) -> Self {
        match r {
            CountRepr::Exact(k) => Self::Exact(k),
            CountRepr::Range([min, max]) => Self::Range { min, max },
        }
    }
}

impl From<Count> for CountRepr {
    fn from(c: Count) -> Self {
        match c {
            Count::Exact(k) => Self::Exact(k),
            Count::Range { min, max } => Self::Range([min, max]),
        }
    }
}

/// Builder-side description of a pipeline node.
///
/// A `Node` tree is what callers assemble (directly or from a
/// [`crate::PipelineConfig`]); [`crate::Pipeline::new`] validates it and
/// flattens it into an immutable arena.
pub struct Node<I> {
    pub(crate) label: Option<String>,
    pub(crate) kind: NodeKind<I>,
    pub(crate) weights: Option<Vec<f64>>,
    pub(crate) replace: bool,
}

pub(crate) enum NodeKind<I> {
    Leaf(Box<dyn Transform<I>>),
    Identity,
    Sequential(Vec<Node<I>>),
    Sometimes { p: f64, child: Box<Node<I>> },
    OneOf(Vec<Node<I>>),
    SomeOf { children: Vec<Node<I>>, count: Count },
}

impl<I> NodeKind<I> {
    pub(crate) fn kind_name(&self) -> &str {
        match self {
            Self::Leaf(t) => t.name(),
            Self::Identity => "identity",
            Self::Sequential(_) => "sequential",
            Self::Sometimes { .. } => "sometimes",
            Self::OneOf(_) => "one_of",
            Self::SomeOf { .. } => "some_of",
        }
    }
}

impl<I> Node<I> {
    fn from_kind(kind: NodeKind<I>) -> Self {
        Self {
            label: None,
            kind,
            weights: None,
            replace: false,
        }
    }

    /// Wrap a leaf transform.
    pub fn leaf(transform: impl Transform<I> + 'static) -> Self {
        Self::boxed_leaf(Box::new(transform))
    }

    /// Wrap an already boxed leaf transform.
    pub fn boxed_leaf(transform: Box<dyn Transform<I>>) -> Self {
        Self::from_kind(NodeKind::Leaf(transform))
    }

    /// No-op node; draws nothing.
    pub fn identity() -> Self {
        Self::from_kind(NodeKind::Identity)
    }

    /// Apply every child in order, threading the image through.
    pub fn sequential(children: impl IntoIterator<Item = Node<I>>) -> Self {
        Self::from_kind(NodeKind::Sequential(children.into_iter().collect()))
    }

    /// Apply `child` with probability `p`.
    pub fn sometimes(p: f64, child: Node<I>) -> Self {
        Self::from_kind(NodeKind::Sometimes {
            p,
            child: Box::new(child),
        })
    }

    /// Apply exactly one child, chosen uniformly.
    pub fn one_of(children: impl IntoIterator<Item = Node<I>>) -> Self {
        Self::from_kind(NodeKind::OneOf(children.into_iter().collect()))
    }

    /// Apply exactly one child, chosen with the given weights.
    pub fn one_of_weighted(children: impl IntoIterator<Item = Node<I>>, weights: Vec<f64>) -> Self {
        Self::one_of(children).weighted(weights)
    }

    /// Apply `count` children, in the order they are drawn.
    ///
    /// Without [`Node::with_replacement`] the selected children are distinct.
    pub fn some_of(children: impl IntoIterator<Item = Node<I>>, count: impl Into<Count>) -> Self {
        Self::from_kind(NodeKind::SomeOf {
            children: children.into_iter().collect(),
            count: count.into(),
        })
    }

    /// Attach a label, recorded on the node's trace entries.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Selection weights for `one_of` / `some_of` children.
    pub fn weighted(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Let `some_of` pick the same child more than once.
    pub fn with_replacement(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Kind name this node records in traces.
    pub fn kind_name(&self) -> &str {
        self.kind.kind_name()
    }

    /// Optional label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<I> fmt::Debug for Node<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Node");
        d.field("kind", &self.kind_name());
        if let Some(label) = &self.label {
            d.field("label", label);
        }
        match &self.kind {
            NodeKind::Leaf(_) | NodeKind::Identity => {}
            NodeKind::Sequential(children) | NodeKind::OneOf(children) => {
                d.field("children", children);
            }
            NodeKind::Sometimes { p, child } => {
                d.field("p", p).field("child", child);
            }
            NodeKind::SomeOf { children, count } => {
                d.field("count", count).field("children", children);
            }
        }
        if let Some(w) = &self.weights {
            d.field("weights", w);
        }
        if self.replace {
            d.field("replace", &true);
        }
        d.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/node.rs"]
mod tests;
