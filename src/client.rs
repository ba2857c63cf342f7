//! Client Module
//!
//! Blocking convenience API on top of the multiplexer.
//!
//! ## Responsibilities
//! - Build typed commands for each server verb
//! - Wait for the reply, bounded by the configured request timeout
//! - Cancel timed-out requests so they do not linger in the pending table
//! - Convert reply data into caller types
//!
//! Many threads may share one `Client`; their requests are multiplexed over
//! the same connection.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{DocmuxError, Result};
use crate::mux::{Multiplexer, ReplyHandle};
use crate::network::{Connection, TcpTransport, Transport};
use crate::protocol::{Command, Condition};

/// Document server client
pub struct Client<T: Transport> {
    mux: Arc<Multiplexer<T>>,

    /// Reply wait limit, `None` to wait forever
    request_timeout: Option<Duration>,

    /// Owned TCP connection, kept alive for the client's lifetime
    _connection: Option<Connection>,
}

impl Client<TcpTransport> {
    /// Connect over TCP using `config`
    pub fn connect(config: Config) -> Result<Self> {
        let connection = Connection::open(&config)?;
        tracing::info!("Connected to {}", connection.peer_addr());

        Ok(Self {
            mux: Arc::clone(connection.multiplexer()),
            request_timeout: config.request_timeout(),
            _connection: Some(connection),
        })
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over an existing multiplexer
    pub fn with_multiplexer(mux: Arc<Multiplexer<T>>, request_timeout: Option<Duration>) -> Self {
        Self {
            mux,
            request_timeout,
            _connection: None,
        }
    }

    pub fn multiplexer(&self) -> &Arc<Multiplexer<T>> {
        &self.mux
    }

    // =========================================================================
    // Raw Execution
    // =========================================================================

    /// Send a command without waiting
    pub fn dispatch(&self, command: &Command) -> ReplyHandle {
        self.mux.send_command(command)
    }

    /// Send a command and wait for its reply data
    pub fn execute(&self, command: &Command) -> Result<Value> {
        let handle = self.dispatch(command);
        self.wait(handle)
    }

    /// Wait on a handle with the client's timeout
    ///
    /// A timed-out request is cancelled, so a late reply is dropped.
    pub fn wait(&self, handle: ReplyHandle) -> Result<Value> {
        let Some(timeout) = self.request_timeout else {
            return handle.wait();
        };

        match handle.wait_timeout(timeout) {
            Err(DocmuxError::Timeout { id, waited_ms }) => {
                self.mux.cancel(id);
                // The reply may have landed between the timeout and the cancel.
                match handle.try_result() {
                    Some(Ok(data)) => Ok(data),
                    Some(Err(DocmuxError::Abandoned(_))) | None => {
                        Err(DocmuxError::Timeout { id, waited_ms })
                    }
                    Some(Err(e)) => Err(e),
                }
            }
            outcome => outcome,
        }
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Check whether a collection exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let data = self.execute(&Command::Exists { name: name.to_string() })?;
        match data {
            Value::Bool(exists) => Ok(exists),
            other => Err(DocmuxError::Protocol(format!(
                "EXISTS returned non-boolean data: {}",
                other
            ))),
        }
    }

    /// Create a collection
    pub fn create(&self, name: &str) -> Result<()> {
        self.execute(&Command::Create { name: name.to_string() })?;
        Ok(())
    }

    /// Delete a whole collection
    pub fn delete_collection(&self, collection: &str) -> Result<()> {
        self.execute(&Command::DeleteCollection {
            collection: collection.to_string(),
        })?;
        Ok(())
    }

    /// List the documents of a collection, optionally filtered
    pub fn list(&self, collection: &str, condition: Option<Condition>) -> Result<Value> {
        self.execute(&Command::List {
            collection: collection.to_string(),
            condition,
        })
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Fetch a document as raw JSON
    pub fn get(&self, collection: &str, document: &str) -> Result<Value> {
        self.execute(&Command::Get {
            collection: collection.to_string(),
            document: document.to_string(),
        })
    }

    /// Fetch a document and deserialize it
    pub fn get_as<D: DeserializeOwned>(&self, collection: &str, document: &str) -> Result<D> {
        let data = self.get(collection, document)?;
        Ok(serde_json::from_value(data)?)
    }

    /// Create or replace a document
    pub fn set<V: Serialize + ?Sized>(&self, collection: &str, document: &str, value: &V) -> Result<()> {
        self.execute(&Command::set(collection, document, value)?)?;
        Ok(())
    }

    /// Delete one document
    pub fn delete(&self, collection: &str, document: &str) -> Result<()> {
        self.execute(&Command::DeleteDocument {
            collection: collection.to_string(),
            document: document.to_string(),
        })?;
        Ok(())
    }
}
