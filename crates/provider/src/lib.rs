//! # Provider
//!
//! The lifecycle of a declarative resource provider.
//!
//! A caller sends one request at a time: check a configuration, plan a
//! change, apply a plan, refresh, import or upgrade persisted state.
//! A provider answers each from the request alone and keeps nothing
//! between calls.
//!
//! ## Core Concepts
//!
//! - **Resource**: answers the lifecycle calls for one resource type
//! - **DynamicValue**: an opaque, schema-typed value carried between calls
//! - **Diagnostic**: a problem with the carried values, returned in a response
//! - **Registry**: maps type names to resources
//! - **dispatch**: routes a tagged [`Request`] to its resource
//!
//! ## Example
//!
//! ```ignore
//! use provider::{Registry, Request, ReadResourceRequest, DynamicValue, dispatch};
//! use std::sync::Arc;
//!
//! let mut registry = Registry::new();
//! registry.register(Arc::new(MyResource::new()))?;
//!
//! let response = dispatch(&registry, &Request::ReadResource(ReadResourceRequest {
//!     type_name: "my_resource".into(),
//!     current_state: DynamicValue(serde_json::json!({"id": "x"})),
//! }))?;
//! ```
//!
//! ## Observer Trait
//!
//! [`CallObserver`] receives progress updates from [`dispatch_batch`],
//! so the crate can report progress without depending on a UI.

pub mod context;
pub mod diff;
mod error;
pub mod executor;
pub mod registry;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{CallObserver, NoObserver};
pub use diff::{AttributeChange, ChangeKind, ChangeSummary, PlanAction, attribute_changes};
pub use error::{Error, Result};
pub use executor::{dispatch, dispatch_batch, dispatch_batch_simple, dispatch_json};
pub use registry::Registry;
pub use resource::{Resource, SharedResource, decode_value, encode_value};
pub use types::{
    ApplyChangeRequest, ApplyChangeResponse, Diagnostic, DynamicValue, HasDiagnostics,
    ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource, PlanChangeRequest,
    PlanChangeResponse, ReadResourceRequest, ReadResourceResponse, Request, Response, Severity,
    UpgradeResourceStateRequest, UpgradeResourceStateResponse, ValidateConfigRequest,
    ValidateConfigResponse,
};
