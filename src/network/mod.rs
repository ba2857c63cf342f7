//! Network Module
//!
//! The connection side of the multiplexer.
//!
//! ## Architecture
//! - `Transport`: outbound capability, sends one text frame
//! - `Connection`: TCP stream, one frame per line, with a reader thread that
//!   feeds inbound frames to `Multiplexer::on_frame_received`
//! - A crossbeam `Sender<String>` is also a transport, for in-process peers

mod connection;

pub use connection::{Connection, TcpTransport};

use std::sync::Arc;

use crossbeam::channel::Sender;

use crate::error::{DocmuxError, Result};

/// Outbound half of a message-oriented connection
///
/// Implementations must accept concurrent calls; framing and delivery are
/// their own concern.
pub trait Transport: Send + Sync {
    /// Hand one complete frame to the connection
    fn send(&self, frame: &str) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, frame: &str) -> Result<()> {
        (**self).send(frame)
    }
}

impl Transport for Sender<String> {
    fn send(&self, frame: &str) -> Result<()> {
        Sender::send(self, frame.to_string())
            .map_err(|_| DocmuxError::Network("frame channel closed".to_string()))
    }
}
