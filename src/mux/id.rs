//! Request identifiers
//!
//! Identifiers are rendered as decimal tokens in frames. The generator never
//! hands out the same value twice, whichever strategy it uses.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::IdStrategy;
use crate::error::DocmuxError;

/// Correlation identifier of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = DocmuxError;

    /// Only the canonical decimal form is accepted, so `01` or `+1` never
    /// alias request `1`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || DocmuxError::Protocol(format!("invalid request id '{}'", token));

        let canonical = !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && (token == "0" || !token.starts_with('0'));
        if !canonical {
            return Err(invalid());
        }

        token.parse::<u64>().map(RequestId).map_err(|_| invalid())
    }
}

/// Strictly increasing identifier source
#[derive(Debug)]
pub struct IdGenerator {
    strategy: IdStrategy,
    last: u64,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, last: 0 }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Produce the next identifier
    pub fn next_id(&mut self) -> RequestId {
        let id = self.peek_id();
        self.last = id.value();
        id
    }

    /// The identifier `next_id` would return now, without consuming it
    pub fn peek_id(&self) -> RequestId {
        let candidate = match self.strategy {
            IdStrategy::Counter => self.last + 1,
            // Same millisecond or a clock step backwards: bump past the last id.
            IdStrategy::Timestamp => unix_millis().max(self.last + 1),
        };
        RequestId(candidate)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
