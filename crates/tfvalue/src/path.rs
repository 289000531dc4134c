//! Attribute paths into a typed value

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of an [`AttributePath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Object attribute by name
    Attribute(String),
    /// List element by position
    Index(usize),
}

/// Location of a value inside a resource object, e.g. `components[1].prefix`
///
/// Serializes as a JSON array of steps: `["components", 1, "prefix"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    /// The empty path, pointing at the root object
    pub fn root() -> Self {
        Self::default()
    }

    /// Path with a single attribute step
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::root().join_attribute(name)
    }

    /// Extend with an attribute step
    pub fn join_attribute(&self, name: impl Into<String>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Attribute(name.into()));
        Self { steps }
    }

    /// Extend with a list index step
    pub fn join_index(&self, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Index(index));
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether `self` equals `other` or lies underneath it
    pub fn starts_with(&self, other: &AttributePath) -> bool {
        self.steps.starts_with(&other.steps)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
