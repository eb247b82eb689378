use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single sampled value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// Bernoulli outcome.
    Bool(bool),
    /// Selected alternative of a weighted choice.
    Index(u32),
    /// Continuous sample.
    Float(f64),
    /// Integer sample.
    Int(i64),
}

impl ParamValue {
    /// Short type name used in replay diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Index(_) => "index",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
        }
    }

    /// Boolean payload, if this is a [`ParamValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Index payload, if this is a [`ParamValue::Index`].
    pub fn as_index(&self) -> Option<u32> {
        match *self {
            Self::Index(i) => Some(i),
            _ => None,
        }
    }

    /// Float payload, if this is a [`ParamValue::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Integer payload, if this is a [`ParamValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }
}

/// A named sampled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamEntry {
    /// Parameter name, e.g. `angle` or `index`.
    pub name: String,
    /// Sampled value.
    pub value: ParamValue,
}

/// Ordered sequence of the values one node sampled during one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterRecord {
    entries: SmallVec<[ParamEntry; 4]>,
}

impl ParameterRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named value.
    pub fn push(&mut self, name: impl Into<String>, value: ParamValue) {
        self.entries.push(ParamEntry {
            name: name.into(),
            value,
        });
    }

    /// Builder-style [`ParameterRecord::push`].
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.push(name, value);
        self
    }

    /// First value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }

    /// All values recorded under `name`, in draw order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ParamValue> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.name == name)
            .map(|e| e.value)
    }

    /// Entries in draw order.
    pub fn entries(&self) -> &[ParamEntry] {
        &self.entries
    }

    /// Number of recorded values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing was sampled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/record.rs"]
mod tests;
