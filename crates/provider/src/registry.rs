//! Registry mapping resource type names to their implementations

use crate::error::{Error, Result};
use crate::resource::{Resource, SharedResource};
use std::collections::BTreeMap;
use tfvalue::Schema;

/// The set of resource types a provider serves
///
/// Built once at startup and read-only afterwards. Each call looks up
/// its resource by type name.
#[derive(Debug, Default)]
pub struct Registry {
    resources: BTreeMap<&'static str, SharedResource>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource after checking its schema
    pub fn register(&mut self, resource: SharedResource) -> Result<()> {
        let type_name = resource.type_name();
        resource
            .schema()
            .validate()
            .map_err(|source| Error::InvalidSchema {
                type_name: type_name.to_string(),
                source,
            })?;

        if self.resources.contains_key(type_name) {
            return Err(Error::DuplicateResourceType(type_name.to_string()));
        }

        log::debug!(
            "Registered resource type {type_name} (schema version {})",
            resource.schema().version
        );
        self.resources.insert(type_name, resource);
        Ok(())
    }

    /// Look up the resource serving `type_name`
    pub fn get(&self, type_name: &str) -> Result<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(|resource| &**resource)
            .ok_or_else(|| Error::UnknownResourceType(type_name.to_string()))
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Schema of every registered resource, keyed by type name
    pub fn schemas(&self) -> BTreeMap<&'static str, &Schema> {
        self.resources
            .iter()
            .map(|(name, resource)| (*name, resource.schema()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
