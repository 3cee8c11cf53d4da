//! Remote object handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for an object that lives in the engine process.
///
/// A handle does not own the remote object: ownership stays engine-side, and
/// a handle becomes stale once the remote object is destroyed or the
/// connection ends. Several local proxies may wrap the same handle; equality
/// is defined over the handle value, never over proxy identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    /// Wrap a raw handle value received from the engine.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value, as sent on the wire.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectHandle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
