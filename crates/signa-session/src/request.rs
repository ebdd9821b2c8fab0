//! Tokens that tie asynchronous results to the request that produced them.

use std::fmt;

/// Identifies one issued request. Tokens compare by issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues monotonically increasing tokens and remembers the latest.
///
/// Only the most recently issued token is current. Issuing a new token or
/// calling [`invalidate`](Self::invalidate) makes every earlier one stale.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    issued: u64,
    current: Option<RequestToken>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        token
    }

    /// Supersede the current request without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<RequestToken> {
        self.current
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }
}
