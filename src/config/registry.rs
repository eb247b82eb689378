use crate::foundation::error::{AugError, AugResult};
use crate::leaves::geometric::{FlipHorizontal, FlipVertical, RandomCrop, Rotate90};
use crate::leaves::photometric::{Brightness, Contrast, GaussianBlur};
use crate::targets::augmentable::Augmentable;
use crate::transform::core::Transform;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Kind names handled by the engine itself.
pub const RESERVED_KINDS: [&str; 5] = ["identity", "sequential", "sometimes", "one_of", "some_of"];

type LeafCtor<I> = Box<dyn Fn(&Value) -> AugResult<Box<dyn Transform<I>>> + Send + Sync>;

/// Leaf kinds available to [`crate::Pipeline::from_config`].
///
/// Each kind maps to a constructor that builds a transform from the node's
/// JSON `params`. The engine never needs to know a kind's identity.
pub struct Registry<I> {
    ctors: BTreeMap<String, LeafCtor<I>>,
}

impl<I> Default for Registry<I> {
    fn default() -> Self {
        Self {
            ctors: BTreeMap::new(),
        }
    }
}

impl<I> fmt::Debug for Registry<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}

impl<I> Registry<I> {
    /// Registry without any leaf kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `kind` with a constructor from JSON params.
    ///
    /// Combinator names are reserved; re-registering a kind replaces it.
    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F) -> AugResult<()>
    where
        F: Fn(&Value) -> AugResult<Box<dyn Transform<I>>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if kind.is_empty() {
            return Err(AugError::invalid_configuration("leaf kind must be non-empty"));
        }
        if RESERVED_KINDS.contains(&kind.as_str()) {
            return Err(AugError::invalid_configuration(format!(
                "'{kind}' is a reserved combinator kind"
            )));
        }
        self.ctors.insert(kind, Box::new(ctor));
        Ok(())
    }

    /// Register `kind` for a leaf type whose params deserialize straight into it.
    pub fn register_serde<T>(&mut self, kind: impl Into<String>) -> AugResult<()>
    where
        T: DeserializeOwned + Transform<I> + 'static,
        I: 'static,
    {
        self.register(kind, |params: &Value| {
            let leaf: T = parse_params(params)?;
            Ok(Box::new(leaf) as Box<dyn Transform<I>>)
        })
    }

    /// `true` when `kind` is a registered leaf kind.
    pub fn contains(&self, kind: &str) -> bool {
        self.ctors.contains_key(kind)
    }

    /// Registered leaf kinds in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    pub(crate) fn build_leaf(
        &self,
        kind: &str,
        params: &Value,
    ) -> Option<AugResult<Box<dyn Transform<I>>>> {
        self.ctors.get(kind).map(|ctor| ctor(params))
    }
}

impl<I: Augmentable + 'static> Registry<I> {
    /// Registry with every built-in leaf kind.
    pub fn builtin() -> Self {
        let mut r = Self::new();
        r.insert_builtin("flip_horizontal", |p| {
            no_params("flip_horizontal", p)?;
            Ok(Box::new(FlipHorizontal))
        });
        r.insert_builtin("flip_vertical", |p| {
            no_params("flip_vertical", p)?;
            Ok(Box::new(FlipVertical))
        });
        r.insert_builtin("rotate_left", |p| {
            no_params("rotate_left", p)?;
            Ok(Box::new(Rotate90::left()))
        });
        r.insert_builtin("rotate_right", |p| {
            no_params("rotate_right", p)?;
            Ok(Box::new(Rotate90::right()))
        });
        r.insert_builtin("random_crop", |p| {
            let crop: RandomCrop = parse_params(p)?;
            crop.validate()?;
            Ok(Box::new(crop))
        });
        r.insert_builtin("brightness", |p| {
            let b: Brightness = parse_params(p)?;
            Ok(Box::new(Brightness::new(b.delta)?))
        });
        r.insert_builtin("contrast", |p| {
            let c: Contrast = parse_params(p)?;
            Ok(Box::new(Contrast::new(c.factor)?))
        });
        r.insert_builtin("gaussian_blur", |p| {
            let g: GaussianBlur = parse_params(p)?;
            Ok(Box::new(GaussianBlur::new(g.sigma)?))
        });
        r
    }

    fn insert_builtin<F>(&mut self, kind: &str, ctor: F)
    where
        F: Fn(&Value) -> AugResult<Box<dyn Transform<I>>> + Send + Sync + 'static,
    {
        self.ctors.insert(kind.to_owned(), Box::new(ctor));
    }
}

/// Deserialize leaf params; an absent (`null`) params block reads as `{}`.
pub fn parse_params<T: DeserializeOwned>(params: &Value) -> AugResult<T> {
    let value = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(value).map_err(|e| AugError::invalid_configuration(e.to_string()))
}

fn no_params(kind: &str, params: &Value) -> AugResult<()> {
    match params {
        Value::Null => Ok(()),
        Value::Object(m) if m.is_empty() => Ok(()),
        _ => Err(AugError::invalid_configuration(format!(
            "'{kind}' takes no params"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/registry.rs"]
mod tests;
