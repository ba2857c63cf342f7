//! # docmux
//!
//! A client for JSON document servers that multiplexes many concurrent
//! requests over a single connection:
//! - Every request carries a correlation identifier (`ID <n> ...`)
//! - Replies are matched by identifier, in any order
//! - Each request completes exactly once (resolved, rejected or abandoned)
//! - Pending requests are rejected when the connection goes away
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Client (get/set/list/...)                   │
//! │                    (Many caller threads)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Multiplexer                            │
//! │          (Id generation + Pending table, one lock)           │
//! └──────────┬──────────────────────────────────▲───────────────┘
//!            │ send(frame)                      │ on_frame_received
//!            ▼                                  │
//!   ┌─────────────────┐                ┌────────┴────────┐
//!   │    Transport    │                │  Reader thread  │
//!   │  (TCP writer)   │                │   (TCP lines)   │
//!   └────────┬────────┘                └────────▲────────┘
//!            │                                  │
//!            └──────────────► Server ───────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod pending;
pub mod mux;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DocmuxError, Result};
pub use config::{Config, IdStrategy};
pub use client::Client;
pub use mux::{FrameOutcome, Multiplexer, ReplyHandle, RequestId};
pub use network::{Connection, Transport};
pub use protocol::{Command, Condition};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of docmux
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
