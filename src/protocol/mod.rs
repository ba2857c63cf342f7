//! Protocol Module
//!
//! Defines the text protocol spoken with the document server.
//!
//! ## Frame Format
//!
//! ### Request
//! ```text
//! ┌────┬──────────────┬────────┬─────────────────────────┐
//! │ ID │ <identifier> │ <VERB> │ <arg> <arg> ...         │
//! └────┴──────────────┴────────┴─────────────────────────┘
//! ```
//!
//! ### Verbs
//! - EXISTS: `<name>`
//! - CREATE: `<name>`
//! - GET:    `<document> FROM <collection>`
//! - SET:    `<document> FROM <collection> TO <json>`
//! - LIST:   `<collection> [WHERE <key> EQ|GT|LT <value>]`
//! - DELETE: `<collection>` or `<document> FROM <collection>`
//!
//! ### Reply
//! ```text
//! ┌────┬──────────────┬──────────────────────────────────┐
//! │ ID │ <identifier> │ {"status": ..., "data"|"message"} │
//! └────┴──────────────┴──────────────────────────────────┘
//! ```

mod command;
mod response;
mod codec;

pub use command::{Command, CommandVerb, Condition};
pub use response::{Reply, STATUS_SUCCESS};
pub use codec::{
    decode_reply, encode_command, encode_request, split_reply, ReplyFrame, CORRELATION_MARKER,
};
