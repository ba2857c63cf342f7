//! Pending Request Module
//!
//! Bookkeeping for requests that have been sent but not yet answered.
//!
//! ## Responsibilities
//! - Map request identifiers to completion handles
//! - Hand each entry out at most once (`take_by_id`)
//! - No network logic; the multiplexer serializes all access
//!
//! ## Completion
//! Each entry owns the sending half of a capacity-one channel. `resolve` and
//! `reject` consume the entry, so a request completes exactly once.

mod table;

pub use table::PendingTable;

use std::time::{Duration, Instant};

use crossbeam::channel::Sender;
use serde_json::Value;

use crate::error::{DocmuxError, Result};
use crate::mux::RequestId;

/// Sending half of a request's completion channel
pub type Completion = Sender<Result<Value>>;

/// One in-flight request awaiting its reply
#[derive(Debug)]
pub struct PendingRequest {
    id: RequestId,
    verb: String,
    issued_at: Instant,
    completion: Completion,
}

impl PendingRequest {
    /// Create an entry for `id`, completed through `completion`
    pub fn new(id: RequestId, verb: impl Into<String>, completion: Completion) -> Self {
        Self {
            id,
            verb: verb.into(),
            issued_at: Instant::now(),
            completion,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Time since the request was issued
    pub fn elapsed(&self) -> Duration {
        self.issued_at.elapsed()
    }

    /// Complete with the reply's data
    pub fn resolve(self, data: Value) {
        self.complete(Ok(data));
    }

    /// Complete with an error
    pub fn reject(self, error: DocmuxError) {
        self.complete(Err(error));
    }

    fn complete(self, outcome: Result<Value>) {
        // The receiver may already be gone if the caller stopped waiting.
        if self.completion.try_send(outcome).is_err() {
            tracing::trace!("Request {} completed with no one waiting", self.id);
        }
    }
}
