//! Command definitions
//!
//! Represents commands sent to the server.

use std::fmt;

use serde::Serialize;

use crate::error::Result;

/// Command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandVerb {
    Exists,
    Create,
    Get,
    Set,
    List,
    Delete,
}

impl CommandVerb {
    /// The verb token as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandVerb::Exists => "EXISTS",
            CommandVerb::Create => "CREATE",
            CommandVerb::Get => "GET",
            CommandVerb::Set => "SET",
            CommandVerb::List => "LIST",
            CommandVerb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for CommandVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for LIST, rendered as `<key> <OP> <value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Eq { key: String, value: String },
    Gt { key: String, value: String },
    Lt { key: String, value: String },
}

impl Condition {
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Eq { key: key.into(), value: value.into() }
    }

    pub fn gt(key: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Gt { key: key.into(), value: value.into() }
    }

    pub fn lt(key: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Lt { key: key.into(), value: value.into() }
    }

    /// Build a condition from an operator token (`EQ`, `GT`, `LT`)
    pub fn from_parts(key: &str, op: &str, value: &str) -> Option<Self> {
        match op.to_ascii_uppercase().as_str() {
            "EQ" => Some(Self::eq(key, value)),
            "GT" => Some(Self::gt(key, value)),
            "LT" => Some(Self::lt(key, value)),
            _ => None,
        }
    }

    fn parts(&self) -> (&str, &'static str, &str) {
        match self {
            Condition::Eq { key, value } => (key.as_str(), "EQ", value.as_str()),
            Condition::Gt { key, value } => (key.as_str(), "GT", value.as_str()),
            Condition::Lt { key, value } => (key.as_str(), "LT", value.as_str()),
        }
    }
}

/// A command for the document server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask whether a named resource exists
    Exists { name: String },

    /// Create a collection
    Create { name: String },

    /// Fetch one document
    Get { collection: String, document: String },

    /// Upsert one document; `value` is already serialized JSON
    Set { collection: String, document: String, value: String },

    /// Enumerate a collection, optionally filtered
    List { collection: String, condition: Option<Condition> },

    /// Drop a whole collection
    DeleteCollection { collection: String },

    /// Remove one document
    DeleteDocument { collection: String, document: String },
}

impl Command {
    /// Build a SET command, serializing `value` to compact JSON
    pub fn set<V: Serialize + ?Sized>(
        collection: impl Into<String>,
        document: impl Into<String>,
        value: &V,
    ) -> Result<Self> {
        Ok(Command::Set {
            collection: collection.into(),
            document: document.into(),
            value: serde_json::to_string(value)?,
        })
    }

    /// Get the command verb
    pub fn verb(&self) -> CommandVerb {
        match self {
            Command::Exists { .. } => CommandVerb::Exists,
            Command::Create { .. } => CommandVerb::Create,
            Command::Get { .. } => CommandVerb::Get,
            Command::Set { .. } => CommandVerb::Set,
            Command::List { .. } => CommandVerb::List,
            Command::DeleteCollection { .. } | Command::DeleteDocument { .. } => {
                CommandVerb::Delete
            }
        }
    }

    /// Arguments following the verb, in wire order
    pub fn args(&self) -> Vec<&str> {
        match self {
            Command::Exists { name } | Command::Create { name } => vec![name.as_str()],
            Command::Get { collection, document }
            | Command::DeleteDocument { collection, document } => {
                vec![document.as_str(), "FROM", collection.as_str()]
            }
            Command::Set { collection, document, value } => {
                vec![document.as_str(), "FROM", collection.as_str(), "TO", value.as_str()]
            }
            Command::List { collection, condition } => {
                let mut args = vec![collection.as_str()];
                if let Some(condition) = condition {
                    let (key, op, value) = condition.parts();
                    args.extend(["WHERE", key, op, value]);
                }
                args
            }
            Command::DeleteCollection { collection } => vec![collection.as_str()],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb().as_str())?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
