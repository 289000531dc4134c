//! Observer hooks for batch dispatch
//!
//! These traits let the provider crate report progress without
//! depending on a specific UI.

use crate::error::Result;
use crate::types::{Request, Response};

/// Progress callback for batch dispatch
///
/// Implement this trait to receive progress updates while a batch of
/// lifecycle calls runs.
pub trait CallObserver: Send {
    /// Called before a batch starts
    fn on_batch_start(&mut self, count: usize);

    /// Called before a call runs (sequential batches only)
    fn on_call_start(&mut self, index: usize, request: &Request);

    /// Called with the outcome of each call, in request order
    fn on_call_complete(&mut self, index: usize, request: &Request, outcome: &Result<Response>);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// No-op observer
pub struct NoObserver;

impl CallObserver for NoObserver {
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_call_start(&mut self, _index: usize, _request: &Request) {}
    fn on_call_complete(&mut self, _index: usize, _request: &Request, _outcome: &Result<Response>) {}
    fn on_batch_complete(&mut self) {}
}
