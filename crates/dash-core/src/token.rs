// File: crates/dash-core/src/token.rs
// Summary: Last-request-wins tokens for superseding in-flight loads.

/// Captured at issue time; compared on completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn get(self) -> u64 { self.0 }
}

/// Monotonic request counter. Only the most recently issued token is current;
/// results carrying any older token are stale and must be dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest && self.latest != 0
    }

    /// Pass `value` through only when `token` is still current.
    pub fn accept<T>(&self, token: RequestToken, value: T) -> Option<T> {
        self.is_current(token).then_some(value)
    }

    /// Most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        (self.latest != 0).then_some(RequestToken(self.latest))
    }
}
