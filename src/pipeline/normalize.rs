use crate::foundation::error::{AugError, AugResult};
use crate::foundation::ids::NodeIdx;
use crate::foundation::path::{ConfigIssues, PathElem};
use crate::pipeline::ir::{NodeIR, NodeKindIR, Pipeline};
use crate::pipeline::node::{Count, Node, NodeKind};

impl<I> Pipeline<I> {
    /// Validate `root` and flatten it into an immutable arena.
    ///
    /// Every problem in the tree is reported at once, each prefixed with the
    /// path of the offending node (`$.root.children[1].params.p`).
    #[tracing::instrument(skip(root), fields(root_kind = root.kind_name()))]
    pub fn new(root: Node<I>) -> AugResult<Self> {
        let mut issues = ConfigIssues::default();
        validate_tree(&root, &mut issues);
        issues.into_result()?;
        Self::from_validated(root)
    }

    pub(crate) fn from_validated(root: Node<I>) -> AugResult<Self> {
        let mut nodes = Vec::new();
        let root = flatten(root, &mut nodes)?;
        tracing::debug!(nodes = nodes.len(), "pipeline normalized");
        Ok(Self { nodes, root })
    }
}

/// Check every node value of the tree rooted at `$.root`.
pub(crate) fn validate_tree<I>(root: &Node<I>, issues: &mut ConfigIssues) {
    let mut path = vec![PathElem::Field("root")];
    validate_node(root, &mut path, issues);
}

fn validate_node<I>(node: &Node<I>, path: &mut Vec<PathElem>, issues: &mut ConfigIssues) {
    let kind = node.kind_name();
    if kind.is_empty() {
        issues.push(path, "node kind must be non-empty");
    }

    let children: &[Node<I>] = match &node.kind {
        NodeKind::Leaf(_) | NodeKind::Identity => &[],
        NodeKind::Sequential(children) => children,
        NodeKind::Sometimes { p, child } => {
            if !p.is_finite() || !(0.0..=1.0).contains(p) {
                with_params(path, "p", |path| {
                    issues.push(path, format!("probability must be in [0, 1] (got {p})"))
                });
            }
            std::slice::from_ref(child.as_ref())
        }
        NodeKind::OneOf(children) => {
            if children.is_empty() {
                with_field(path, "children", |path| {
                    issues.push(path, "one_of requires at least one child")
                });
            }
            children
        }
        NodeKind::SomeOf { children, count } => {
            if children.is_empty() {
                with_field(path, "children", |path| {
                    issues.push(path, "some_of requires at least one child")
                });
            }
            if let Count::Range { min, max } = *count
                && min > max
            {
                with_params(path, "k", |path| {
                    issues.push(path, format!("range min {min} exceeds max {max}"))
                });
            }
            if !node.replace && !children.is_empty() {
                let selectable = match &node.weights {
                    Some(w) => w.iter().filter(|w| **w > 0.0).count(),
                    None => children.len(),
                };
                if count.max() as usize > selectable {
                    with_params(path, "k", |path| {
                        issues.push(
                            path,
                            format!(
                                "cannot pick {} distinct children from {selectable} selectable without replacement",
                                count.max()
                            ),
                        )
                    });
                }
            }
            children
        }
    };

    match (&node.kind, &node.weights) {
        (NodeKind::OneOf(_) | NodeKind::SomeOf { .. }, Some(weights)) => {
            with_params(path, "weights", |path| {
                validate_weights(weights, children.len(), path, issues)
            });
        }
        (_, Some(_)) => with_params(path, "weights", |path| {
            issues.push(path, format!("'{kind}' does not take weights"))
        }),
        _ => {}
    }
    if node.replace && !matches!(node.kind, NodeKind::SomeOf { .. }) {
        with_params(path, "replace", |path| {
            issues.push(path, format!("'{kind}' does not take replace"))
        });
    }

    path.push(PathElem::Field("children"));
    for (i, child) in children.iter().enumerate() {
        path.push(PathElem::Index(i));
        validate_node(child, path, issues);
        path.pop();
    }
    path.pop();
}

fn validate_weights(
    weights: &[f64],
    n_children: usize,
    path: &mut Vec<PathElem>,
    issues: &mut ConfigIssues,
) {
    if weights.len() != n_children {
        issues.push(
            path,
            format!(
                "expected {n_children} weight(s), one per child (got {})",
                weights.len()
            ),
        );
        return;
    }
    let mut ok = true;
    for (i, w) in weights.iter().enumerate() {
        if !w.is_finite() || *w < 0.0 {
            path.push(PathElem::Index(i));
            issues.push(path, format!("weight must be finite and >= 0 (got {w})"));
            path.pop();
            ok = false;
        }
    }
    let total: f64 = weights.iter().sum();
    if ok && (!total.is_finite() || total <= 0.0) {
        issues.push(path, format!("weights must have a finite sum > 0 (got {total})"));
    }
}

fn with_field(path: &mut Vec<PathElem>, field: &'static str, f: impl FnOnce(&mut Vec<PathElem>)) {
    path.push(PathElem::Field(field));
    f(path);
    path.pop();
}

fn with_params(path: &mut Vec<PathElem>, field: &'static str, f: impl FnOnce(&mut Vec<PathElem>)) {
    path.push(PathElem::Field("params"));
    with_field(path, field, f);
    path.pop();
}

// DFS pre-order: a node's index is allocated before its children's.
fn flatten<I>(node: Node<I>, nodes: &mut Vec<NodeIR<I>>) -> AugResult<NodeIdx> {
    let idx = NodeIdx(
        u32::try_from(nodes.len())
            .map_err(|_| AugError::invalid_configuration("too many nodes"))?,
    );
    nodes.push(NodeIR {
        label: node.label,
        kind: NodeKindIR::Identity,
    });

    let kind = match node.kind {
        NodeKind::Leaf(t) => NodeKindIR::Leaf(t),
        NodeKind::Identity => NodeKindIR::Identity,
        NodeKind::Sequential(children) => NodeKindIR::Sequential {
            children: flatten_all(children, nodes)?,
        },
        NodeKind::Sometimes { p, child } => NodeKindIR::Sometimes {
            p,
            child: flatten(*child, nodes)?,
        },
        NodeKind::OneOf(children) => {
            let weights = node.weights.unwrap_or_else(|| vec![1.0; children.len()]);
            NodeKindIR::OneOf {
                children: flatten_all(children, nodes)?,
                weights,
            }
        }
        NodeKind::SomeOf { children, count } => {
            let weights = node.weights.unwrap_or_else(|| vec![1.0; children.len()]);
            NodeKindIR::SomeOf {
                children: flatten_all(children, nodes)?,
                weights,
                count,
                replace: node.replace,
            }
        }
    };
    nodes[idx.index()].kind = kind;
    Ok(idx)
}

fn flatten_all<I>(children: Vec<Node<I>>, nodes: &mut Vec<NodeIR<I>>) -> AugResult<Vec<NodeIdx>> {
    children.into_iter().map(|c| flatten(c, nodes)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/normalize.rs"]
mod tests;
