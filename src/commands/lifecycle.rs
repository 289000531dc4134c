//! Single lifecycle calls
//!
//! Each command reads its input values, dispatches one request through
//! the registry and prints the response.

use anyhow::{Context as AnyhowContext, Result};
use provider::{
    ApplyChangeRequest, DynamicValue, ImportResourceStateRequest, PlanChangeRequest,
    ReadResourceRequest, Request, Response, UpgradeResourceStateRequest, ValidateConfigRequest,
    dispatch,
};
use tfvalue::{AttributeType, ObjectSchema};

use super::{emit, read_json, read_state, render};
use crate::Context;
use crate::cli::{ApplyArgs, PlanArgs, ReadArgs, UpgradeArgs, ValidateArgs};

fn call(ctx: &Context, request: &Request) -> Result<Response> {
    dispatch(&ctx.registry, request)
        .with_context(|| format!("{} failed for {}", request.operation(), request.type_name()))
}

pub fn validate(ctx: &Context, args: ValidateArgs) -> Result<bool> {
    let request = Request::ValidateConfig(ValidateConfigRequest {
        type_name: args.type_name,
        config: DynamicValue(read_json(&args.config)?),
    });
    let response = call(ctx, &request)?;
    let ok = emit(ctx, &response)?;
    if ok && !ctx.quiet {
        crate::ui::success("Configuration is valid");
    }
    Ok(ok)
}

pub fn plan(ctx: &Context, args: PlanArgs) -> Result<bool> {
    let proposed = DynamicValue(read_json(&args.proposed)?);
    let prior = read_state(args.prior.as_deref())?;
    let config = match args.config.as_deref() {
        Some(path) => DynamicValue(read_json(path)?),
        None => {
            let schema = ctx.registry.get(&args.type_name)?.schema();
            DynamicValue(implied_config(&schema.object, proposed.as_json()))
        }
    };

    let request = Request::PlanChange(PlanChangeRequest {
        type_name: args.type_name,
        prior_state: prior.clone(),
        proposed_new_state: proposed,
        config,
    });
    let response = call(ctx, &request)?;

    if let Response::PlanChange(plan) = &response
        && let Some(planned) = &plan.planned_state
        && !ctx.quiet
    {
        let resource = ctx.registry.get(request.type_name())?;
        render::plan(
            resource.schema(),
            request.type_name(),
            &prior,
            planned,
            &plan.requires_replace,
            ctx.verbose > 0,
        );
    }
    emit(ctx, &response)
}

/// The configuration a proposed state was derived from
///
/// Known computed leaves are cleared; only the provider sets those.
fn implied_config(object: &ObjectSchema, raw: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value as Raw;

    match raw {
        Raw::Array(items) => Raw::Array(items.iter().map(|v| implied_config(object, v)).collect()),
        Raw::Object(map) if !tfvalue::codec::is_unknown_marker(raw) => Raw::Object(
            map.iter()
                .map(|(name, v)| {
                    let cleared = match object.attribute(name) {
                        Some(attr) => match &attr.ty {
                            AttributeType::Nested(nested) => implied_config(&nested.object, v),
                            _ if attr.computed && !tfvalue::codec::is_unknown_marker(v) => {
                                Raw::Null
                            }
                            _ => v.clone(),
                        },
                        None => v.clone(),
                    };
                    (name.clone(), cleared)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

pub fn apply(ctx: &Context, args: ApplyArgs) -> Result<bool> {
    let request = Request::ApplyChange(ApplyChangeRequest {
        type_name: args.type_name,
        prior_state: read_state(args.prior.as_deref())?,
        planned_state: DynamicValue(read_json(&args.planned)?),
        config: DynamicValue(read_json(&args.config)?),
    });
    let response = call(ctx, &request)?;
    emit(ctx, &response)
}

pub fn read(ctx: &Context, args: ReadArgs) -> Result<bool> {
    let request = Request::ReadResource(ReadResourceRequest {
        type_name: args.type_name,
        current_state: DynamicValue(read_json(&args.state)?),
    });
    let response = call(ctx, &request)?;
    emit(ctx, &response)
}

pub fn import(ctx: &Context, type_name: String, id: String) -> Result<bool> {
    let request = Request::ImportResourceState(ImportResourceStateRequest { type_name, id });
    let response = call(ctx, &request)?;
    if let Response::ImportResourceState(import) = &response
        && import.imported.is_empty()
        && !ctx.quiet
    {
        crate::ui::info(&format!(
            "{} does not support import; nothing was imported",
            request.type_name()
        ));
    }
    emit(ctx, &response)
}

pub fn upgrade(ctx: &Context, args: UpgradeArgs) -> Result<bool> {
    let request = Request::UpgradeResourceState(UpgradeResourceStateRequest {
        type_name: args.type_name,
        version: args.version,
        raw_state: read_json(&args.raw)?,
    });
    let response = call(ctx, &request)?;
    emit(ctx, &response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use std::fs;
    use tempfile::TempDir;

    fn context() -> Context {
        let generator = crate::resource::generator(Some(3)).unwrap();
        Context {
            verbose: 0,
            quiet: true,
            config: ProviderConfig::default(),
            registry: crate::resource::registry(generator).unwrap(),
        }
    }

    fn write(dir: &TempDir, name: &str, json: &serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, json.to_string()).unwrap();
        path
    }

    #[test]
    fn test_validate_exit_codes() {
        let ctx = context();
        let dir = TempDir::new().unwrap();
        let good = write(
            &dir,
            "good.json",
            &serde_json::json!({"id": null, "length": 2, "separator": null, "components": []}),
        );
        let bad = write(&dir, "bad.json", &serde_json::json!({"length": 2}));

        let ok = validate(
            &ctx,
            ValidateArgs {
                type_name: "random_pet".into(),
                config: good,
            },
        )
        .unwrap();
        assert!(ok);

        let ok = validate(
            &ctx,
            ValidateArgs {
                type_name: "random_pet".into(),
                config: bad,
            },
        )
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_implied_config_clears_computed_leaves() {
        let schema = crate::resource::pet::schema::schema();
        let proposed = serde_json::json!({
            "id": "a-fox",
            "length": 2,
            "separator": {"$unknown": true},
            "components": [{"prefix": "a", "secret": "s", "computed": "a-fox"}]
        });
        let config = implied_config(&schema.object, &proposed);
        assert_eq!(
            config,
            serde_json::json!({
                "id": null,
                "length": null,
                "separator": {"$unknown": true},
                "components": [{"prefix": "a", "secret": "s", "computed": null}]
            })
        );
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let ctx = context();
        let dir = TempDir::new().unwrap();
        let raw = write(&dir, "raw.json", &serde_json::json!({"id": "fox"}));
        let result = upgrade(
            &ctx,
            UpgradeArgs {
                type_name: "random_cat".into(),
                raw,
                version: 0,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_input_file() {
        let ctx = context();
        let result = read(
            &ctx,
            ReadArgs {
                type_name: "random_pet".into(),
                state: "/nonexistent/state.json".into(),
            },
        );
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }
}
