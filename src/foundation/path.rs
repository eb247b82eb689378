use crate::foundation::error::{AugError, AugResult};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct ConfigIssue {
    pub(crate) path: Vec<PathElem>,
    pub(crate) message: String,
}

impl ConfigIssue {
    pub(crate) fn at(path: &[PathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

pub(crate) fn format_path(path: &[PathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            PathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            PathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Issues collected over a whole configuration walk, reported together.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConfigIssues {
    pub(crate) issues: Vec<ConfigIssue>,
}

impl ConfigIssues {
    pub(crate) fn push(&mut self, path: &[PathElem], message: impl Into<String>) {
        self.issues.push(ConfigIssue::at(path, message));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn into_result(self) -> AugResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AugError::invalid_configuration(self.to_string()))
        }
    }
}

impl fmt::Display for ConfigIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/path.rs"]
mod tests;
