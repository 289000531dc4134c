//! Batch dispatch of tagged requests
//!
//! The input file holds a JSON array of requests, each tagged with its
//! `operation`. Calls run in parallel; responses come back in order.

use anyhow::{Context as AnyhowContext, Result, bail};
use colored::Colorize;
use provider::{CallObserver, HasDiagnostics, Request, Response, dispatch_batch};
use std::path::Path;

use super::read_json;
use crate::Context;
use crate::ui;

/// Reports each finished call on stderr
struct BatchProgress {
    quiet: bool,
    total: usize,
    failed: usize,
}

impl CallObserver for BatchProgress {
    fn on_batch_start(&mut self, count: usize) {
        self.total = count;
        if !self.quiet {
            ui::info(&format!("Dispatching {count} request(s)"));
        }
    }

    fn on_call_start(&mut self, _index: usize, _request: &Request) {}

    fn on_call_complete(
        &mut self,
        index: usize,
        request: &Request,
        outcome: &provider::Result<Response>,
    ) {
        let status = match outcome {
            Ok(response) if !response.has_errors() => "ok".green(),
            Ok(_) => {
                self.failed += 1;
                "error diagnostics".yellow()
            }
            Err(_) => {
                self.failed += 1;
                "failed".red()
            }
        };
        if !self.quiet {
            eprintln!(
                "{} {} {} {status}",
                format!("[{}/{}]", index + 1, self.total).blue().bold(),
                request.operation(),
                request.type_name(),
            );
        }
    }

    fn on_batch_complete(&mut self) {
        if self.quiet {
            return;
        }
        if self.failed == 0 {
            ui::success(&format!("All {} request(s) succeeded", self.total));
        } else {
            ui::warn(&format!("{} of {} request(s) failed", self.failed, self.total));
        }
    }
}

/// Parse a batch document into requests
pub fn parse_requests(raw: serde_json::Value) -> Result<Vec<Request>> {
    serde_json::from_value(raw).context("Batch file must be a JSON array of tagged requests")
}

pub fn run(ctx: &Context, file: &Path, jobs: Option<usize>) -> Result<bool> {
    let jobs = jobs.unwrap_or(ctx.config.jobs);
    if jobs == 0 {
        bail!("--jobs must be at least 1");
    }
    let requests = parse_requests(read_json(file)?)?;

    let mut progress = BatchProgress {
        quiet: ctx.quiet,
        total: 0,
        failed: 0,
    };
    let outcomes = dispatch_batch(&ctx.registry, &requests, jobs, &mut progress)?;

    let output: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match outcome {
            Ok(response) => serde_json::to_value(response)
                .unwrap_or_else(|e| serde_json::json!({"error": e.to_string()})),
            Err(e) => serde_json::json!({"error": e.to_string()}),
        })
        .collect();
    println!("{}", ctx.config.to_json(&output)?);

    Ok(progress.failed == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_requests() {
        let requests = parse_requests(json!([
            {"operation": "import_resource_state", "type_name": "random_pet", "id": "x"},
            {"operation": "upgrade_resource_state", "type_name": "random_pet", "version": 0, "raw_state": {}}
        ]))
        .unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].operation(), "upgrade_resource_state");
    }

    #[test]
    fn test_parse_requests_rejects_non_array() {
        assert!(parse_requests(json!({"operation": "read_resource"})).is_err());
    }

    #[test]
    fn test_progress_counts_failures() {
        let mut progress = BatchProgress {
            quiet: true,
            total: 0,
            failed: 0,
        };
        let request = parse_requests(json!([
            {"operation": "import_resource_state", "type_name": "random_pet", "id": "x"}
        ]))
        .unwrap()
        .remove(0);

        progress.on_batch_start(2);
        progress.on_call_complete(
            0,
            &request,
            &Ok(Response::ImportResourceState(Default::default())),
        );
        progress.on_call_complete(
            1,
            &request,
            &Err(provider::Error::UnknownResourceType("random_cat".into())),
        );
        progress.on_batch_complete();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.failed, 1);
    }
}
