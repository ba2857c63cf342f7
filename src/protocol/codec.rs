//! Protocol codec
//!
//! Encoding and decoding functions for correlated text frames.
//!
//! ## Wire Format
//!
//! ### Request Frame
//! ```text
//! ID <identifier> <VERB> <arg> <arg> ...
//! ```
//!
//! ### Reply Frame
//! ```text
//! ID <identifier> <json-payload>
//! ```
//!
//! Tokens are separated by single spaces. The payload is everything after
//! the second space, so JSON containing spaces is kept intact.

use crate::error::{DocmuxError, Result};
use crate::mux::RequestId;
use super::{Command, Reply};

/// Leading token of every correlated frame
pub const CORRELATION_MARKER: &str = "ID";

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request frame from a verb and its arguments
///
/// Format: `ID <id> <VERB> <args...>`, with no trailing space when there are
/// no arguments.
pub fn encode_request<S: AsRef<str>>(id: RequestId, verb: &str, args: &[S]) -> String {
    let mut frame = format!("{} {} {}", CORRELATION_MARKER, id, verb);
    for arg in args {
        frame.push(' ');
        frame.push_str(arg.as_ref());
    }
    frame
}

/// Encode a typed command as a request frame
pub fn encode_command(id: RequestId, command: &Command) -> String {
    encode_request(id, command.verb().as_str(), &command.args())
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// A reply frame split into its correlation token and payload text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyFrame<'a> {
    /// Raw identifier token, not yet validated
    pub id_token: &'a str,

    /// Payload text with its internal spaces preserved
    pub payload: &'a str,
}

/// Split a reply frame into identifier token and payload
pub fn split_reply(frame: &str) -> Result<ReplyFrame<'_>> {
    let mut parts = frame.splitn(3, ' ');

    match parts.next() {
        Some(CORRELATION_MARKER) => {}
        _ => {
            return Err(DocmuxError::Protocol(format!(
                "frame does not start with '{}'",
                CORRELATION_MARKER
            )))
        }
    }

    let id_token = parts
        .next()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| DocmuxError::Protocol("frame has no identifier".to_string()))?;

    let payload = parts
        .next()
        .ok_or_else(|| DocmuxError::Protocol(format!("frame {} has no payload", id_token)))?;

    Ok(ReplyFrame { id_token, payload })
}

/// Decode a reply frame into its identifier token and parsed reply
pub fn decode_reply(frame: &str) -> Result<(&str, Reply)> {
    let ReplyFrame { id_token, payload } = split_reply(frame)?;
    let reply = Reply::parse(payload)?;
    Ok((id_token, reply))
}
