//! Reply handle
//!
//! The caller's side of a dispatched request.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, TryRecvError};
use serde_json::Value;

use super::RequestId;
use crate::error::{DocmuxError, Result};
use crate::pending::PendingRequest;

/// Awaitable result of one request
///
/// Receives exactly one outcome, delivered by the multiplexer when the
/// matching reply arrives (or the connection closes).
#[derive(Debug)]
pub struct ReplyHandle {
    id: RequestId,
    receiver: Receiver<Result<Value>>,
}

impl ReplyHandle {
    /// Create a pending entry and the handle that observes it
    pub(crate) fn pair(id: RequestId, verb: &str) -> (PendingRequest, ReplyHandle) {
        let (sender, receiver) = channel::bounded(1);
        (PendingRequest::new(id, verb, sender), ReplyHandle { id, receiver })
    }

    /// Handle that is already completed with `error`
    pub(crate) fn rejected(id: RequestId, error: DocmuxError) -> Self {
        let (sender, receiver) = channel::bounded(1);
        // Capacity one and a fresh channel: this cannot fail.
        let _ = sender.try_send(Err(error));
        ReplyHandle { id, receiver }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Block until the request completes
    pub fn wait(self) -> Result<Value> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(DocmuxError::Abandoned(self.id)),
        }
    }

    /// Block for at most `timeout`
    ///
    /// On `Timeout` the request is still pending; the handle can be waited on
    /// again.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Value> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(DocmuxError::Timeout {
                id: self.id,
                waited_ms: timeout.as_millis() as u64,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(DocmuxError::Abandoned(self.id)),
        }
    }

    /// Non-blocking poll; `None` while the request is still outstanding
    pub fn try_result(&self) -> Option<Result<Value>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DocmuxError::Abandoned(self.id))),
        }
    }
}
