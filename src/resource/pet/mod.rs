//! The `random_pet` resource
//!
//! A random pet name is generated once, on the first apply, and then kept
//! for as long as its inputs stay the same. Changing `length`, `separator`
//! or a component's `prefix`/`secret` plans a new name.

pub mod instance;
pub mod schema;
pub mod upgrade;

use instance::{
    Component, PetInstance, component_unchanged, fold, length_is_defaulted, snapshots_of, unchanged,
};
use petname::Generator;
use provider::{
    ApplyChangeRequest, ApplyChangeResponse, Diagnostic, PlanChangeRequest, PlanChangeResponse,
    Resource, Result, UpgradeResourceStateRequest, UpgradeResourceStateResponse,
    ValidateConfigRequest, ValidateConfigResponse, decode_value, encode_value,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tfvalue::{AttributePath, Schema, Value, unknown_if_any};

/// Reconciler for `random_pet`
///
/// Holds nothing but its schema and the shared name generator.
#[derive(Debug)]
pub struct PetResource {
    schema: Schema,
    generator: Arc<Generator>,
}

impl PetResource {
    pub fn new(generator: Arc<Generator>) -> Self {
        Self {
            schema: schema::schema(),
            generator,
        }
    }

    /// Decode prior state; `None` when there is no prior instance
    fn prior_instance(&self, prior: &Value) -> Option<PetInstance> {
        (!prior.is_null()).then(|| PetInstance::from_value(prior))
    }

    fn planned_id(&self, prior: Option<&PetInstance>, proposed: &Value) -> Value {
        let Some(prior) = prior.filter(|p| !p.id.is_empty()) else {
            return Value::Unknown;
        };
        let inputs = input_values(proposed);
        unknown_if_any(inputs.iter().copied(), || {
            let current = PetInstance::from_value(proposed);
            let id_matches = match proposed.get("id") {
                Some(Value::String(id)) => *id == prior.id,
                _ => true,
            };
            if id_matches && unchanged(prior, &current) {
                Value::from(prior.id.as_str())
            } else {
                Value::Unknown
            }
        })
    }

    /// Plan each component's `computed` snapshot
    ///
    /// A snapshot covers every inner component and the base name, so it is
    /// only kept together with the id. Otherwise it is Unknown unless the
    /// configuration supplies it for a component whose inputs are unchanged.
    fn planned_components(
        &self,
        prior: Option<&PetInstance>,
        proposed: &Value,
        config: &Value,
        id_kept: bool,
    ) -> Value {
        let Some(items) = proposed.get("components").and_then(Value::as_list) else {
            return match proposed.get("components") {
                Some(Value::Unknown) => Value::Unknown,
                _ => Value::List(Vec::new()),
            };
        };

        let planned = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let Some(attrs) = item.as_object() else {
                    return item.clone();
                };
                let prior_component = prior.and_then(|p| p.components.get(i));
                let supplied = config
                    .get("components")
                    .and_then(Value::as_list)
                    .and_then(|list| list.get(i))
                    .and_then(|c| c.get("computed"))
                    .and_then(Value::as_str)
                    .filter(|_| {
                        prior_component.is_none_or(|before| {
                            component_unchanged(before, &Component::from_value(item))
                        })
                    });
                let kept = prior_component
                    .filter(|_| id_kept)
                    .and_then(|c| c.computed.as_deref());
                let computed = supplied.or(kept).map_or(Value::Unknown, Value::from);

                let mut attrs = attrs.clone();
                attrs.insert("computed".to_string(), computed);
                Value::Object(attrs)
            })
            .collect();
        Value::List(planned)
    }

    /// Attributes whose change forced a new name
    fn replace_paths(&self, prior: &PetInstance, proposed: &Value) -> Vec<AttributePath> {
        let current = PetInstance::from_value(proposed);
        let mut paths = Vec::new();
        if proposed.get("length").is_some_and(Value::is_unknown) || current.length != prior.length {
            paths.push(AttributePath::attribute("length"));
        }
        if proposed.get("separator").is_some_and(Value::is_unknown)
            || current.separator != prior.separator
        {
            paths.push(AttributePath::attribute("separator"));
        }
        let components_changed = current.components.len() != prior.components.len()
            || !prior
                .components
                .iter()
                .zip(&current.components)
                .all(|(a, b)| component_unchanged(a, b))
            || proposed
                .get("components")
                .is_some_and(|c| !c.is_wholly_known());
        if components_changed {
            paths.push(AttributePath::attribute("components"));
        }
        paths
    }

    /// Fill a planned value's unknowns from config, then materialize it
    fn materialize(&self, planned: &Value, config: &Value) -> PetInstance {
        let mut pet = PetInstance::from_value(&fill_unknown(planned, config));

        let (id, computed) = {
            let prefixes = pet.prefixes();
            if pet.id.is_empty() {
                let base = self.generator.generate(pet.length, schema::WORD_SEPARATOR);
                log::debug!("Generated base name {base} ({} words)", pet.length);
                fold(&prefixes, &pet.separator, &base)
            } else {
                let computed = snapshots_of(&pet.id, &prefixes, &pet.separator);
                (pet.id.clone(), computed)
            }
        };

        pet.id = id;
        for (component, folded) in pet.components.iter_mut().zip(computed) {
            if component.computed.is_none() {
                component.computed = Some(folded);
            }
        }
        pet
    }
}

impl Resource for PetResource {
    fn type_name(&self) -> &'static str {
        schema::TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate_config(&self, req: &ValidateConfigRequest) -> Result<ValidateConfigResponse> {
        let config = match decode_value(&self.schema, &req.config, "configuration") {
            Ok(config) => config,
            Err(diag) => return Ok(ValidateConfigResponse::from_diagnostics(vec![diag])),
        };

        let mut diagnostics: Vec<Diagnostic> = self
            .schema
            .object
            .check_config(&config)
            .into_iter()
            .map(Diagnostic::from)
            .collect();

        if let Some(length) = config.get("length").filter(|l| length_is_defaulted(l)) {
            log::warn!("length {length:?} is not a positive whole number, using the default");
            diagnostics.push(
                Diagnostic::warning(
                    "Invalid length",
                    format!(
                        "length must be a positive whole number; {} words will be used instead.",
                        schema::DEFAULT_LENGTH
                    ),
                )
                .with_attribute(AttributePath::attribute("length")),
            );
        }
        Ok(ValidateConfigResponse { diagnostics })
    }

    fn plan_change(&self, req: &PlanChangeRequest) -> Result<PlanChangeResponse> {
        // Destroy
        if req.proposed_new_state.is_null() {
            return Ok(PlanChangeResponse {
                planned_state: Some(req.proposed_new_state.clone()),
                ..Default::default()
            });
        }

        let proposed = match decode_value(&self.schema, &req.proposed_new_state, "proposed state") {
            Ok(value) => value,
            Err(diag) => return Ok(PlanChangeResponse::from_diagnostics(vec![diag])),
        };
        let prior = match decode_value(&self.schema, &req.prior_state, "prior state") {
            Ok(value) => value,
            Err(diag) => return Ok(PlanChangeResponse::from_diagnostics(vec![diag])),
        };
        let prior = self.prior_instance(&prior);
        let config = match decode_value(&self.schema, &req.config, "configuration") {
            Ok(value) => value,
            Err(diag) => return Ok(PlanChangeResponse::from_diagnostics(vec![diag])),
        };

        let defaults = PetInstance::from_value(&proposed);
        let mut planned = BTreeMap::new();
        let id = self.planned_id(prior.as_ref(), &proposed);
        planned.insert("length".to_string(), match proposed.get("length") {
            Some(Value::Unknown) => Value::Unknown,
            _ => Value::from(defaults.length),
        });
        planned.insert("separator".to_string(), match proposed.get("separator") {
            Some(Value::Unknown) => Value::Unknown,
            _ => Value::from(defaults.separator.as_str()),
        });
        planned.insert(
            "components".to_string(),
            self.planned_components(prior.as_ref(), &proposed, &config, id.is_known()),
        );

        let requires_replace = match &prior {
            Some(prior) if id.is_unknown() => self.replace_paths(prior, &proposed),
            _ => Vec::new(),
        };
        planned.insert("id".to_string(), id);

        match encode_value(&self.schema, &Value::Object(planned), "planned state") {
            Ok(planned_state) => Ok(PlanChangeResponse {
                planned_state: Some(planned_state),
                requires_replace,
                diagnostics: Vec::new(),
            }),
            Err(diag) => Ok(PlanChangeResponse::from_diagnostics(vec![diag])),
        }
    }

    fn apply_change(&self, req: &ApplyChangeRequest) -> Result<ApplyChangeResponse> {
        // Destroy
        if req.planned_state.is_null() {
            return Ok(ApplyChangeResponse {
                new_state: Some(req.planned_state.clone()),
                diagnostics: Vec::new(),
            });
        }

        let planned = match decode_value(&self.schema, &req.planned_state, "planned state") {
            Ok(value) => value,
            Err(diag) => return Ok(ApplyChangeResponse::from_diagnostics(vec![diag])),
        };
        let config = match decode_value(&self.schema, &req.config, "configuration") {
            Ok(value) => value,
            Err(diag) => return Ok(ApplyChangeResponse::from_diagnostics(vec![diag])),
        };

        let pet = self.materialize(&planned, &config);
        log::debug!("Applied {} as {}", schema::TYPE_NAME, pet.id);

        match encode_value(&self.schema, &pet.to_value(), "new state") {
            Ok(new_state) => Ok(ApplyChangeResponse {
                new_state: Some(new_state),
                diagnostics: Vec::new(),
            }),
            Err(diag) => Ok(ApplyChangeResponse::from_diagnostics(vec![diag])),
        }
    }

    fn upgrade_resource_state(
        &self,
        req: &UpgradeResourceStateRequest,
    ) -> Result<UpgradeResourceStateResponse> {
        let upgraded = match upgrade::upgrade(&req.raw_state, req.version) {
            Ok(value) => value,
            Err(diag) => {
                log::warn!(
                    "Rejected {} state at version {}: {}",
                    schema::TYPE_NAME,
                    req.version,
                    diag.detail
                );
                return Ok(UpgradeResourceStateResponse::from_diagnostics(vec![diag]));
            }
        };
        if req.version < schema::SCHEMA_VERSION {
            log::info!(
                "Upgraded {} state from version {} to {}",
                schema::TYPE_NAME,
                req.version,
                schema::SCHEMA_VERSION
            );
        }

        match encode_value(&self.schema, &upgraded, "upgraded state") {
            Ok(state) => Ok(UpgradeResourceStateResponse {
                upgraded_state: Some(state),
                diagnostics: Vec::new(),
            }),
            Err(diag) => Ok(UpgradeResourceStateResponse::from_diagnostics(vec![diag])),
        }
    }
}

/// The values a new name depends on
fn input_values(value: &Value) -> Vec<&Value> {
    let mut inputs: Vec<&Value> = ["length", "separator"]
        .iter()
        .filter_map(|name| value.get(name))
        .collect();
    match value.get("components") {
        // `computed` is an output and never decides the name
        Some(Value::List(items)) => {
            for item in items {
                if item.as_object().is_some() {
                    inputs.extend(["prefix", "secret"].iter().filter_map(|name| item.get(name)));
                } else {
                    inputs.push(item);
                }
            }
        }
        Some(other) => inputs.push(other),
        None => {}
    }
    inputs
}

/// Replace every Unknown in `planned` with the matching part of `config`
fn fill_unknown(planned: &Value, config: &Value) -> Value {
    match planned {
        Value::Unknown => config.clone(),
        Value::Object(attrs) => Value::Object(
            attrs
                .iter()
                .map(|(name, v)| {
                    let other = config.get(name).unwrap_or(&Value::Null);
                    (name.clone(), fill_unknown(v, other))
                })
                .collect(),
        ),
        Value::List(items) => Value::List(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let other = config.as_list().and_then(|l| l.get(i)).unwrap_or(&Value::Null);
                    fill_unknown(v, other)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
