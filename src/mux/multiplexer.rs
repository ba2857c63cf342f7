//! Request multiplexer
//!
//! Interleaves any number of outstanding requests over one transport and
//! routes each reply back to the request carrying the same identifier.

use parking_lot::Mutex;

use super::{IdGenerator, ReplyHandle, RequestId};
use crate::config::Config;
use crate::error::DocmuxError;
use crate::network::Transport;
use crate::pending::PendingTable;
use crate::protocol::{self, Command, Reply};

/// What happened to one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Matched a pending request and resolved it
    Resolved(RequestId),

    /// Matched a pending request and rejected it with the server's message
    Rejected(RequestId),

    /// Well-formed, but no pending request has this identifier
    Unmatched,

    /// Could not be parsed; dropped
    Malformed,
}

/// State guarded by the multiplexer's lock
#[derive(Debug)]
struct MuxState {
    ids: IdGenerator,
    pending: PendingTable,

    /// Set once the connection is gone; first reason wins
    closed: Option<String>,
}

/// Correlates requests and replies over a single transport
///
/// ## Concurrency
/// - Identifier generation and every table mutation happen under one
///   `parking_lot::Mutex`
/// - `Transport::send` and completion run outside the lock
/// - Share as `Arc<Multiplexer<T>>` between callers and the frame reader
pub struct Multiplexer<T> {
    transport: T,
    state: Mutex<MuxState>,
    reject_on_disconnect: bool,
}

impl<T: Transport> Multiplexer<T> {
    /// Create a multiplexer with default settings
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &Config::default())
    }

    /// Create a multiplexer using the id strategy and disconnect policy of
    /// `config`
    pub fn with_config(transport: T, config: &Config) -> Self {
        Self {
            transport,
            state: Mutex::new(MuxState {
                ids: IdGenerator::new(config.id_strategy),
                pending: PendingTable::new(),
                closed: None,
            }),
            reject_on_disconnect: config.reject_on_disconnect,
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // Outgoing Path
    // =========================================================================

    /// Send a typed command
    pub fn send_command(&self, command: &Command) -> ReplyHandle {
        self.dispatch(command.verb().as_str(), &command.args())
    }

    /// Send `verb` with `args` and return a handle for the reply
    ///
    /// Never fails synchronously: a closed multiplexer or a failed send
    /// surfaces through the returned handle.
    pub fn dispatch<S: AsRef<str>>(&self, verb: &str, args: &[S]) -> ReplyHandle {
        let (id, handle) = {
            let mut state = self.state.lock();

            // Nothing goes on the wire after close, so no id is consumed.
            if let Some(reason) = &state.closed {
                let id = state.ids.peek_id();
                tracing::debug!("Rejecting {} {}: connection closed", verb, id);
                return ReplyHandle::rejected(id, DocmuxError::Disconnected(reason.clone()));
            }

            let id = state.ids.next_id();
            let (request, handle) = ReplyHandle::pair(id, verb);
            state.pending.insert(request);
            (id, handle)
        };

        let frame = protocol::encode_request(id, verb, args);
        tracing::trace!("Sending frame: {}", frame);

        if let Err(e) = self.transport.send(&frame) {
            tracing::warn!("Failed to send request {}: {}", id, e);
            // Already gone if close() drained the table in the meantime.
            if let Some(request) = self.state.lock().pending.take_by_id(id) {
                request.reject(e);
            }
        }

        handle
    }

    // =========================================================================
    // Incoming Path
    // =========================================================================

    /// Route one inbound frame to its pending request
    ///
    /// Malformed and unmatched frames are dropped without touching any other
    /// pending request.
    pub fn on_frame_received(&self, frame: &str) -> FrameOutcome {
        let (id_token, reply) = match protocol::decode_reply(frame) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("Dropping malformed frame ({}): {}", e, frame);
                return FrameOutcome::Malformed;
            }
        };

        let Ok(id) = id_token.parse::<RequestId>() else {
            tracing::debug!("Dropping reply with foreign id token '{}'", id_token);
            return FrameOutcome::Unmatched;
        };

        let Some(request) = self.state.lock().pending.take_by_id(id) else {
            tracing::debug!("Dropping reply for unknown request {}", id);
            return FrameOutcome::Unmatched;
        };

        tracing::trace!(
            "Request {} ({}) answered after {:?}",
            id,
            request.verb(),
            request.elapsed()
        );

        match reply {
            Reply::Success(data) => {
                request.resolve(data);
                FrameOutcome::Resolved(id)
            }
            Reply::Failure(message) => {
                request.reject(DocmuxError::Remote(message));
                FrameOutcome::Rejected(id)
            }
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Withdraw a pending request
    ///
    /// The caller's handle then yields `Abandoned`; a reply arriving later is
    /// treated as unmatched. Returns false if `id` was not pending.
    pub fn cancel(&self, id: RequestId) -> bool {
        let cancelled = self.state.lock().pending.take_by_id(id).is_some();
        if cancelled {
            tracing::debug!("Cancelled request {}", id);
        }
        cancelled
    }

    /// Mark the connection as gone
    ///
    /// Later dispatches are rejected with `Disconnected`. Pending requests are
    /// rejected too unless the disconnect policy keeps them. Returns how many
    /// were rejected.
    pub fn close(&self, reason: &str) -> usize {
        let (reason, drained) = {
            let mut state = self.state.lock();
            let reason = state.closed.get_or_insert_with(|| reason.to_string()).clone();
            let drained = if self.reject_on_disconnect {
                state.pending.drain()
            } else {
                Vec::new()
            };
            (reason, drained)
        };

        let count = drained.len();
        if count > 0 {
            tracing::debug!("Rejecting {} pending requests: {}", count, reason);
        }
        for request in drained {
            request.reject(DocmuxError::Disconnected(reason.clone()));
        }
        count
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed.is_some()
    }

    /// Number of requests awaiting a reply
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Identifiers awaiting a reply, ascending
    pub fn pending_ids(&self) -> Vec<RequestId> {
        self.state.lock().pending.ids()
    }
}
