// Lifecycle calls, one per command
pub mod lifecycle;

// Plan rendering
pub mod render;

// Other commands
pub mod batch;
pub mod schema;

use anyhow::{Context as AnyhowContext, Result};
use provider::{DynamicValue, HasDiagnostics, Response};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use crate::Context;
use crate::ui;

/// Read a JSON document from a file, or stdin for `-`
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Read an optional state file; absent means null
pub fn read_state(path: Option<&Path>) -> Result<DynamicValue> {
    match path {
        Some(path) => Ok(DynamicValue(read_json(path)?)),
        None => Ok(DynamicValue::null()),
    }
}

/// Print a response as JSON on stdout and its diagnostics on stderr
///
/// Returns false when any diagnostic is an error.
pub fn emit(ctx: &Context, response: &Response) -> Result<bool> {
    let json = match response {
        Response::ValidateConfig(r) => ctx.config.to_json(r)?,
        Response::PlanChange(r) => ctx.config.to_json(r)?,
        Response::ApplyChange(r) => ctx.config.to_json(r)?,
        Response::ReadResource(r) => ctx.config.to_json(r)?,
        Response::ImportResourceState(r) => ctx.config.to_json(r)?,
        Response::UpgradeResourceState(r) => ctx.config.to_json(r)?,
    };
    println!("{json}");

    ui::diagnostics(response.diagnostics());
    Ok(!response.has_errors())
}

/// Process exit status for a command outcome
pub fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
