//! Resources served by this provider
//!
//! Every resource type is registered here, once, at startup. A lifecycle
//! call is routed to its resource by type name through the registry.

pub mod pet;

use anyhow::{Context, Result};
use petname::Generator;
use provider::Registry;
use std::sync::Arc;

/// Build the registry of every resource type
pub fn registry(generator: Arc<Generator>) -> Result<Registry> {
    let mut registry = Registry::new();
    registry
        .register(Arc::new(pet::PetResource::new(generator)))
        .context("Failed to register random_pet")?;
    Ok(registry)
}

/// Build the name generator, seeded when a seed is configured
///
/// This is the only place word lists are loaded; a bad list is fatal.
pub fn generator(seed: Option<u64>) -> Result<Arc<Generator>> {
    let generator = match seed {
        Some(seed) => {
            log::info!("Using fixed generator seed {seed}");
            Generator::seeded(seed)
        }
        None => Generator::from_entropy(),
    }
    .context("Failed to load pet name word lists")?;
    Ok(Arc::new(generator))
}
