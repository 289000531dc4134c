//! Dispatch engine - routes lifecycle calls to registered resources

use crate::context::CallObserver;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::{HasDiagnostics, Request, Response};
use rayon::prelude::*;

/// Dispatch one lifecycle call to the resource named in the request
///
/// An unregistered type name is a hard failure. Whatever the resource
/// reports in diagnostics is passed through untouched.
pub fn dispatch(registry: &Registry, request: &Request) -> Result<Response> {
    let resource = registry.get(request.type_name())?;
    log::debug!(
        "Dispatching {} for {}",
        request.operation(),
        request.type_name()
    );

    let response = match request {
        Request::ValidateConfig(req) => resource.validate_config(req).map(Response::ValidateConfig),
        Request::PlanChange(req) => resource.plan_change(req).map(Response::PlanChange),
        Request::ApplyChange(req) => resource.apply_change(req).map(Response::ApplyChange),
        Request::ReadResource(req) => resource.read_resource(req).map(Response::ReadResource),
        Request::ImportResourceState(req) => resource
            .import_resource_state(req)
            .map(Response::ImportResourceState),
        Request::UpgradeResourceState(req) => resource
            .upgrade_resource_state(req)
            .map(Response::UpgradeResourceState),
    };

    match &response {
        Ok(resp) if resp.has_errors() => log::warn!(
            "{} for {} returned {} diagnostic(s) with errors",
            request.operation(),
            request.type_name(),
            resp.diagnostics().len()
        ),
        Ok(_) => log::debug!("{} for {} succeeded", request.operation(), request.type_name()),
        Err(e) => log::error!("{} for {} failed: {e}", request.operation(), request.type_name()),
    }

    response
}

/// Parse a JSON request envelope and dispatch it
pub fn dispatch_json(registry: &Registry, raw: &str) -> Result<Response> {
    let request: Request =
        serde_json::from_str(raw).map_err(|e| Error::MalformedRequest(e.to_string()))?;
    dispatch(registry, &request)
}

/// Dispatch independent calls, in parallel when `jobs > 1`
///
/// Calls share nothing but the registry, so they may run in any order.
/// Outcomes are returned, and reported to the observer, in request order.
/// A failing call never affects the others.
///
/// # Arguments
/// * `registry` - Resources to dispatch to
/// * `requests` - Calls to run
/// * `jobs` - Worker threads (1 runs sequentially)
/// * `observer` - Progress callback
pub fn dispatch_batch<O: CallObserver>(
    registry: &Registry,
    requests: &[Request],
    jobs: usize,
    observer: &mut O,
) -> Result<Vec<Result<Response>>> {
    observer.on_batch_start(requests.len());

    let outcomes = if jobs <= 1 || requests.len() <= 1 {
        // Sequential execution
        let mut outcomes = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            observer.on_call_start(index, request);
            let outcome = dispatch(registry, request);
            observer.on_call_complete(index, request, &outcome);
            outcomes.push(outcome);
        }
        outcomes
    } else {
        // Parallel execution. The observer is not thread-safe, so results
        // are collected first and reported afterwards.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        let outcomes: Vec<Result<Response>> = pool.install(|| {
            requests
                .par_iter()
                .map(|request| dispatch(registry, request))
                .collect()
        });

        for (index, (request, outcome)) in requests.iter().zip(&outcomes).enumerate() {
            observer.on_call_complete(index, request, outcome);
        }
        outcomes
    };

    observer.on_batch_complete();
    Ok(outcomes)
}

/// Batch dispatch without callbacks
pub fn dispatch_batch_simple(
    registry: &Registry,
    requests: &[Request],
    jobs: usize,
) -> Result<Vec<Result<Response>>> {
    use crate::context::NoObserver;

    dispatch_batch(registry, requests, jobs, &mut NoObserver)
}
