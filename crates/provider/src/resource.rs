//! Resource trait for the provider lifecycle
//!
//! A Resource owns a schema and answers the lifecycle calls for one
//! resource type. It keeps no per-instance state: everything a call needs
//! arrives in its request.

use crate::error::Result;
use crate::types::{
    ApplyChangeRequest, ApplyChangeResponse, Diagnostic, DynamicValue, ImportResourceStateRequest,
    ImportResourceStateResponse, PlanChangeRequest, PlanChangeResponse, ReadResourceRequest,
    ReadResourceResponse, UpgradeResourceStateRequest, UpgradeResourceStateResponse,
    ValidateConfigRequest, ValidateConfigResponse,
};
use std::fmt;
use tfvalue::{Schema, Value};

/// Core trait for provider resources
///
/// Every method returns `Ok` with diagnostics for problems in the values
/// carried by the request. `Err` is reserved for hard failures that must
/// abort the call without touching persisted state.
///
/// # Example
///
/// ```ignore
/// use provider::{Resource, PlanChangeRequest, PlanChangeResponse, Result};
///
/// #[derive(Debug)]
/// struct Echo { schema: tfvalue::Schema }
///
/// impl Resource for Echo {
///     fn type_name(&self) -> &'static str { "echo" }
///     fn schema(&self) -> &tfvalue::Schema { &self.schema }
///
///     fn plan_change(&self, req: &PlanChangeRequest) -> Result<PlanChangeResponse> {
///         Ok(PlanChangeResponse {
///             planned_state: Some(req.proposed_new_state.clone()),
///             ..Default::default()
///         })
///     }
///     // apply_change, upgrade_resource_state ...
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Registered type name, e.g. "random_pet"
    fn type_name(&self) -> &'static str;

    /// Current schema; its version is the version new state is written with
    fn schema(&self) -> &Schema;

    /// Check a configuration without changing anything
    ///
    /// Default implementation decodes the configuration and reports
    /// schema flag violations.
    fn validate_config(&self, req: &ValidateConfigRequest) -> Result<ValidateConfigResponse> {
        let diagnostics = match decode_value(self.schema(), &req.config, "configuration") {
            Ok(config) => self
                .schema()
                .object
                .check_config(&config)
                .into_iter()
                .map(Diagnostic::from)
                .collect(),
            Err(diag) => vec![diag],
        };
        Ok(ValidateConfigResponse { diagnostics })
    }

    /// Compute the planned state from prior state and proposed new state
    fn plan_change(&self, req: &PlanChangeRequest) -> Result<PlanChangeResponse>;

    /// Materialize a plan into new state
    fn apply_change(&self, req: &ApplyChangeRequest) -> Result<ApplyChangeResponse>;

    /// Refresh state from the system of record
    ///
    /// Default implementation treats persisted state as authoritative and
    /// returns it unchanged.
    fn read_resource(&self, req: &ReadResourceRequest) -> Result<ReadResourceResponse> {
        Ok(ReadResourceResponse {
            new_state: Some(req.current_state.clone()),
            diagnostics: Vec::new(),
        })
    }

    /// Import an existing object by id
    ///
    /// Default implementation imports nothing.
    fn import_resource_state(
        &self,
        _req: &ImportResourceStateRequest,
    ) -> Result<ImportResourceStateResponse> {
        Ok(ImportResourceStateResponse::default())
    }

    /// Migrate persisted state from an older schema version
    fn upgrade_resource_state(
        &self,
        req: &UpgradeResourceStateRequest,
    ) -> Result<UpgradeResourceStateResponse>;
}

/// Decode a dynamic value against a schema, reporting a mismatch as a diagnostic
pub fn decode_value(
    schema: &Schema,
    raw: &DynamicValue,
    what: &str,
) -> std::result::Result<Value, Diagnostic> {
    raw.decode(&schema.value_type())
        .map_err(|err| Diagnostic::decode_failure(what, &err))
}

/// Encode a value under a schema, reporting drift as a diagnostic
pub fn encode_value(
    schema: &Schema,
    value: &Value,
    what: &str,
) -> std::result::Result<DynamicValue, Diagnostic> {
    DynamicValue::encode(value, &schema.value_type())
        .map_err(|err| Diagnostic::encode_failure(what, &err))
}

/// A shared, type-erased resource
pub type SharedResource = std::sync::Arc<dyn Resource>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HasDiagnostics;
    use serde_json::json;
    use tfvalue::{Attribute, AttributeType, ObjectSchema};

    #[derive(Debug)]
    struct Echo {
        schema: Schema,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                schema: Schema::new(
                    0,
                    ObjectSchema::new(vec![
                        Attribute::computed("id", AttributeType::String),
                        Attribute::required("name", AttributeType::String),
                    ]),
                ),
            }
        }
    }

    impl Resource for Echo {
        fn type_name(&self) -> &'static str {
            "echo"
        }

        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn plan_change(&self, req: &PlanChangeRequest) -> Result<PlanChangeResponse> {
            Ok(PlanChangeResponse {
                planned_state: Some(req.proposed_new_state.clone()),
                ..Default::default()
            })
        }

        fn apply_change(&self, req: &ApplyChangeRequest) -> Result<ApplyChangeResponse> {
            Ok(ApplyChangeResponse {
                new_state: Some(req.planned_state.clone()),
                diagnostics: Vec::new(),
            })
        }

        fn upgrade_resource_state(
            &self,
            req: &UpgradeResourceStateRequest,
        ) -> Result<UpgradeResourceStateResponse> {
            Ok(UpgradeResourceStateResponse {
                upgraded_state: Some(DynamicValue(req.raw_state.clone())),
                diagnostics: Vec::new(),
            })
        }
    }

    fn validate(config: serde_json::Value) -> ValidateConfigResponse {
        Echo::new()
            .validate_config(&ValidateConfigRequest {
                type_name: "echo".into(),
                config: DynamicValue(config),
            })
            .unwrap()
    }

    #[test]
    fn test_default_validate_accepts_good_config() {
        assert!(!validate(json!({"id": null, "name": "x"})).has_errors());
    }

    #[test]
    fn test_default_validate_reports_decode_mismatch() {
        let response = validate(json!({"id": null, "name": 5}));
        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].summary, "Error decoding configuration");
    }

    #[test]
    fn test_default_validate_reports_flag_violations() {
        let response = validate(json!({"id": "mine", "name": null}));
        assert_eq!(response.diagnostics.len(), 2);
    }

    #[test]
    fn test_default_read_is_pass_through() {
        let state = DynamicValue(json!({"id": "a", "name": "x", "extra": [1, 2]}));
        let response = Echo::new()
            .read_resource(&ReadResourceRequest {
                type_name: "echo".into(),
                current_state: state.clone(),
            })
            .unwrap();
        assert_eq!(response.new_state, Some(state));
    }

    #[test]
    fn test_default_import_is_empty() {
        let response = Echo::new()
            .import_resource_state(&ImportResourceStateRequest {
                type_name: "echo".into(),
                id: "anything".into(),
            })
            .unwrap();
        assert!(response.imported.is_empty());
        assert!(response.diagnostics.is_empty());
    }
}
