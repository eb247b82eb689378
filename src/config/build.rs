use crate::config::model::{NodeDef, OneOfParams, PipelineConfig, SomeOfParams, SometimesParams};
use crate::config::registry::{Registry, parse_params};
use crate::foundation::error::{AugError, AugResult};
use crate::foundation::path::{ConfigIssues, PathElem};
use crate::pipeline::ir::Pipeline;
use crate::pipeline::node::Node;
use crate::pipeline::normalize::validate_tree;
use serde::de::DeserializeOwned;
use serde_json::Value;

impl<I> Pipeline<I> {
    /// Build a pipeline from a parsed config, resolving leaf kinds in `registry`.
    ///
    /// Unknown kinds, malformed params and bad tree shapes are all collected
    /// and reported together as one [`crate::AugError::InvalidConfiguration`].
    #[tracing::instrument(skip(config, registry), fields(root_kind = %config.root.kind))]
    pub fn from_config(config: &PipelineConfig, registry: &Registry<I>) -> AugResult<Self> {
        let mut issues = ConfigIssues::default();
        let mut path = vec![PathElem::Field("root")];
        let root = build_node(&config.root, registry, &mut path, &mut issues);
        validate_tree(&root, &mut issues);
        issues.into_result()?;
        Self::from_validated(root)
    }
}

// Problems are recorded in `issues`; the returned node stays structurally
// usable (identity placeholders) so the walk can continue.
fn build_node<I>(
    def: &NodeDef,
    registry: &Registry<I>,
    path: &mut Vec<PathElem>,
    issues: &mut ConfigIssues,
) -> Node<I> {
    let node = match def.kind.as_str() {
        "identity" => {
            expect_no_params(def, path, issues);
            expect_children(def, 0, path, issues);
            Node::identity()
        }
        "sequential" => {
            expect_no_params(def, path, issues);
            Node::sequential(build_children(def, registry, path, issues))
        }
        "sometimes" => {
            let params = params_or_issue::<SometimesParams>(def, path, issues);
            expect_children(def, 1, path, issues);
            let child = build_children(def, registry, path, issues)
                .into_iter()
                .next()
                .unwrap_or_else(Node::identity);
            Node::sometimes(params.map_or(0.0, |p| p.p), child)
        }
        "one_of" => {
            let params = if def.params.is_null() {
                Some(OneOfParams::default())
            } else {
                params_or_issue::<OneOfParams>(def, path, issues)
            };
            let node = Node::one_of(build_children(def, registry, path, issues));
            match params.and_then(|p| p.weights) {
                Some(w) => node.weighted(w),
                None => node,
            }
        }
        "some_of" => {
            let params = params_or_issue::<SomeOfParams>(def, path, issues);
            let children = build_children(def, registry, path, issues);
            match params {
                Some(p) => {
                    let mut node = Node::some_of(children, p.k);
                    if let Some(w) = p.weights {
                        node = node.weighted(w);
                    }
                    if p.replace {
                        node = node.with_replacement();
                    }
                    node
                }
                None => Node::some_of(children, 0).with_replacement(),
            }
        }
        kind => {
            expect_children(def, 0, path, issues);
            match registry.build_leaf(kind, &def.params) {
                Some(Ok(leaf)) => Node::boxed_leaf(leaf),
                Some(Err(e)) => {
                    push_at(path, "params", issues, issue_message(e));
                    Node::identity()
                }
                None => {
                    push_at(path, "kind", issues, format!("unknown node kind '{kind}'"));
                    Node::identity()
                }
            }
        }
    };
    match &def.label {
        Some(label) => node.labeled(label.clone()),
        None => node,
    }
}

fn build_children<I>(
    def: &NodeDef,
    registry: &Registry<I>,
    path: &mut Vec<PathElem>,
    issues: &mut ConfigIssues,
) -> Vec<Node<I>> {
    path.push(PathElem::Field("children"));
    let children = def
        .children
        .iter()
        .enumerate()
        .map(|(i, c)| {
            path.push(PathElem::Index(i));
            let n = build_node(c, registry, path, issues);
            path.pop();
            n
        })
        .collect();
    path.pop();
    children
}

fn params_or_issue<T: DeserializeOwned>(
    def: &NodeDef,
    path: &mut Vec<PathElem>,
    issues: &mut ConfigIssues,
) -> Option<T> {
    match parse_params(&def.params) {
        Ok(p) => Some(p),
        Err(e) => {
            push_at(path, "params", issues, issue_message(e));
            None
        }
    }
}

fn expect_no_params(def: &NodeDef, path: &mut Vec<PathElem>, issues: &mut ConfigIssues) {
    let empty = match &def.params {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        _ => false,
    };
    if !empty {
        push_at(path, "params", issues, format!("'{}' takes no params", def.kind));
    }
}

fn expect_children(def: &NodeDef, n: usize, path: &mut Vec<PathElem>, issues: &mut ConfigIssues) {
    if def.children.len() != n {
        push_at(
            path,
            "children",
            issues,
            format!(
                "'{}' requires exactly {n} child(ren) (got {})",
                def.kind,
                def.children.len()
            ),
        );
    }
}

fn issue_message(e: AugError) -> String {
    match e {
        AugError::InvalidConfiguration(msg) => msg,
        other => other.to_string(),
    }
}

fn push_at(path: &mut Vec<PathElem>, field: &'static str, issues: &mut ConfigIssues, msg: String) {
    path.push(PathElem::Field(field));
    issues.push(path, msg);
    path.pop();
}

#[cfg(test)]
#[path = "../../tests/unit/config/build.rs"]
mod tests;
