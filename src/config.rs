//! Configuration for docmux
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Main configuration for a docmux client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    /// TCP connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Multiplexer Configuration
    // -------------------------------------------------------------------------
    /// How request identifiers are generated
    pub id_strategy: IdStrategy,

    /// Reject every pending request when the connection goes away.
    /// When false, pending requests stay in the table until cancelled.
    pub reject_on_disconnect: bool,

    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// How long the client waits for a reply (milliseconds, 0 = forever)
    pub request_timeout_ms: u64,
}

/// Request identifier strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Strictly increasing counter starting at 1
    #[default]
    Counter,

    /// Unix-epoch milliseconds, bumped past the previous id when the clock
    /// has not moved forward
    Timestamp,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:1337".to_string(),
            connect_timeout_ms: 5000,
            write_timeout_ms: 5000,
            id_strategy: IdStrategy::Counter,
            reject_on_disconnect: true,
            request_timeout_ms: 30_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reply wait limit for the client, `None` when unbounded
    pub fn request_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.request_timeout_ms)
    }

    /// Connect timeout, `None` when left to the OS
    pub fn connect_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.connect_timeout_ms)
    }

    /// Write timeout, `None` when writes may block indefinitely
    pub fn write_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.write_timeout_ms)
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the request identifier strategy
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.config.id_strategy = strategy;
        self
    }

    /// Choose whether pending requests are rejected on disconnect
    pub fn reject_on_disconnect(mut self, reject: bool) -> Self {
        self.config.reject_on_disconnect = reject;
        self
    }

    /// Set the client reply timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
