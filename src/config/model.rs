use crate::foundation::error::{AugError, AugResult};
use crate::pipeline::node::Count;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Serialized pipeline description.
///
/// ```json
/// { "root": { "kind": "sequential", "children": [ { "kind": "flip_horizontal" } ] } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root node.
    pub root: NodeDef,
}

/// One node of a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDef {
    /// Combinator name or registered leaf kind.
    pub kind: String,
    /// Optional label copied into trace nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Child nodes in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDef>,
    /// Kind-specific parameters.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl NodeDef {
    /// Node of `kind` with no children or params.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: None,
            children: Vec::new(),
            params: serde_json::Value::Null,
        }
    }

    /// Append a child.
    pub fn with_child(mut self, child: NodeDef) -> Self {
        self.children.push(child);
        self
    }

    /// Replace the params.
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

impl PipelineConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(s: &str) -> AugResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| AugError::serde(format!("parse pipeline config JSON: {e}")))
    }

    /// Parse a config from any reader producing JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> AugResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| AugError::serde(format!("parse pipeline config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AugResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AugError::serde(format!("open pipeline config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON form.
    pub fn to_json(&self) -> AugResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AugError::serde(format!("serialize pipeline config: {e}")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SometimesParams {
    pub(crate) p: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OneOfParams {
    #[serde(default)]
    pub(crate) weights: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SomeOfParams {
    pub(crate) k: Count,
    #[serde(default)]
    pub(crate) replace: bool,
    #[serde(default)]
    pub(crate) weights: Option<Vec<f64>>,
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
