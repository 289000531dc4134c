//! Request and response envelopes for the lifecycle calls

use serde::{Deserialize, Serialize};
use tfvalue::{AttributePath, CodecError, Type, Value, Violation, codec};

// ============================================================================
// Diagnostics
// ============================================================================

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem reported back to the caller alongside a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    /// Attach the attribute the diagnostic is about
    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }

    /// An incoming value did not match the schema
    pub fn decode_failure(what: &str, err: &CodecError) -> Self {
        Self::error(
            format!("Error decoding {what}"),
            format!("Error decoding {what}: {err}"),
        )
        .with_attribute(err.path().clone())
    }

    /// A computed value could not be serialized under the schema
    pub fn encode_failure(what: &str, err: &CodecError) -> Self {
        Self::error(
            format!("Error encoding {what}"),
            format!("Error encoding {what}: {err}"),
        )
        .with_attribute(err.path().clone())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<Violation> for Diagnostic {
    fn from(violation: Violation) -> Self {
        Self::error(violation.summary, violation.detail).with_attribute(violation.path)
    }
}

/// Access to the diagnostics carried by a response
pub trait HasDiagnostics {
    fn diagnostics(&self) -> &[Diagnostic];

    /// Whether any diagnostic has error severity
    fn has_errors(&self) -> bool {
        self.diagnostics().iter().any(Diagnostic::is_error)
    }
}

// ============================================================================
// Dynamic values
// ============================================================================

/// An opaque, schema-typed value as carried between calls
///
/// The persisted state blob is one of these. Resources decode it against
/// their schema, and it is passed back untouched unless a call changes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicValue(pub serde_json::Value);

impl DynamicValue {
    /// The null value: no object, or destroy intent
    pub fn null() -> Self {
        Self(serde_json::Value::Null)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn decode(&self, ty: &Type) -> tfvalue::Result<Value> {
        codec::decode(&self.0, ty)
    }

    pub fn encode(value: &Value, ty: &Type) -> tfvalue::Result<Self> {
        codec::encode(value, ty).map(Self)
    }
}

impl From<serde_json::Value> for DynamicValue {
    fn from(raw: serde_json::Value) -> Self {
        Self(raw)
    }
}

// ============================================================================
// Lifecycle envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateConfigResponse {
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanChangeRequest {
    pub type_name: String,
    /// Null for a resource that does not exist yet
    #[serde(default)]
    pub prior_state: DynamicValue,
    /// Prior state merged with configuration; null means destroy
    pub proposed_new_state: DynamicValue,
    #[serde(default)]
    pub config: DynamicValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanChangeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_state: Option<DynamicValue>,
    /// Attributes whose change forces a new resource
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<AttributePath>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyChangeRequest {
    pub type_name: String,
    #[serde(default)]
    pub prior_state: DynamicValue,
    /// Null means destroy
    pub planned_state: DynamicValue,
    #[serde(default)]
    pub config: DynamicValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyChangeResponse {
    /// `None` when the call failed and prior state must be kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<DynamicValue>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceRequest {
    pub type_name: String,
    pub current_state: DynamicValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadResourceResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<DynamicValue>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

/// A resource produced by an import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedResource {
    pub type_name: String,
    pub state: DynamicValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResourceStateResponse {
    #[serde(default)]
    pub imported: Vec<ImportedResource>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeResourceStateRequest {
    pub type_name: String,
    /// Schema version the raw state was written with
    pub version: i64,
    /// Persisted state in whatever shape that version used
    pub raw_state: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpgradeResourceStateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgraded_state: Option<DynamicValue>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

macro_rules! impl_has_diagnostics {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasDiagnostics for $ty {
                fn diagnostics(&self) -> &[Diagnostic] {
                    &self.diagnostics
                }
            }

            impl $ty {
                /// A response carrying only diagnostics
                pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
                    Self {
                        diagnostics,
                        ..Default::default()
                    }
                }
            }
        )*
    };
}

impl_has_diagnostics!(
    ValidateConfigResponse,
    PlanChangeResponse,
    ApplyChangeResponse,
    ReadResourceResponse,
    ImportResourceStateResponse,
    UpgradeResourceStateResponse,
);

// ============================================================================
// Tagged request / response
// ============================================================================

/// Any lifecycle request, tagged by operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    ValidateConfig(ValidateConfigRequest),
    PlanChange(PlanChangeRequest),
    ApplyChange(ApplyChangeRequest),
    ReadResource(ReadResourceRequest),
    ImportResourceState(ImportResourceStateRequest),
    UpgradeResourceState(UpgradeResourceStateRequest),
}

impl Request {
    /// Resource type the request addresses
    pub fn type_name(&self) -> &str {
        match self {
            Self::ValidateConfig(r) => &r.type_name,
            Self::PlanChange(r) => &r.type_name,
            Self::ApplyChange(r) => &r.type_name,
            Self::ReadResource(r) => &r.type_name,
            Self::ImportResourceState(r) => &r.type_name,
            Self::UpgradeResourceState(r) => &r.type_name,
        }
    }

    /// Operation name, as used for the serde tag
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ValidateConfig(_) => "validate_config",
            Self::PlanChange(_) => "plan_change",
            Self::ApplyChange(_) => "apply_change",
            Self::ReadResource(_) => "read_resource",
            Self::ImportResourceState(_) => "import_resource_state",
            Self::UpgradeResourceState(_) => "upgrade_resource_state",
        }
    }
}

/// Any lifecycle response, tagged by operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Response {
    ValidateConfig(ValidateConfigResponse),
    PlanChange(PlanChangeResponse),
    ApplyChange(ApplyChangeResponse),
    ReadResource(ReadResourceResponse),
    ImportResourceState(ImportResourceStateResponse),
    UpgradeResourceState(UpgradeResourceStateResponse),
}

impl HasDiagnostics for Response {
    fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::ValidateConfig(r) => r.diagnostics(),
            Self::PlanChange(r) => r.diagnostics(),
            Self::ApplyChange(r) => r.diagnostics(),
            Self::ReadResource(r) => r.diagnostics(),
            Self::ImportResourceState(r) => r.diagnostics(),
            Self::UpgradeResourceState(r) => r.diagnostics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_tagging() {
        let raw = json!({
            "operation": "plan_change",
            "type_name": "random_pet",
            "proposed_new_state": null,
        });
        let request: Request = serde_json::from_value(raw).unwrap();
        assert_eq!(request.operation(), "plan_change");
        assert_eq!(request.type_name(), "random_pet");
        let Request::PlanChange(plan) = request else {
            panic!("expected plan request");
        };
        assert!(plan.prior_state.is_null());
        assert!(plan.proposed_new_state.is_null());
    }

    #[test]
    fn test_request_unknown_operation_fails() {
        let raw = json!({"operation": "destroy_everything", "type_name": "random_pet"});
        assert!(serde_json::from_value::<Request>(raw).is_err());
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diag = Diagnostic::error("Bad", "very bad")
            .with_attribute(AttributePath::attribute("length"));
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            json,
            json!({"severity": "error", "summary": "Bad", "detail": "very bad", "attribute": ["length"]})
        );
    }

    #[test]
    fn test_has_errors() {
        let mut response = ApplyChangeResponse::from_diagnostics(vec![Diagnostic::warning("w", "")]);
        assert!(!response.has_errors());
        response.diagnostics.push(Diagnostic::error("e", ""));
        assert!(response.has_errors());
        assert!(response.new_state.is_none());
    }

    #[test]
    fn test_decode_failure_carries_path() {
        let ty = Type::object([("id", Type::String)]);
        let err = DynamicValue(json!({"id": 3})).decode(&ty).unwrap_err();
        let diag = Diagnostic::decode_failure("config", &err);
        assert!(diag.is_error());
        assert_eq!(diag.attribute, Some(AttributePath::attribute("id")));
    }
}
