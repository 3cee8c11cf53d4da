//! Registry for engine-initiated blocking operations.
//!
//! A module starts a blocking operation by registering its body here,
//! passing the returned token to the engine's begin-blocking-operation
//! call, and letting the engine call back `RunBlockingOperation` with that
//! token. Keying by token allows several operations to be in flight at
//! once; the registry is owned by the module server and shared with the
//! callback router.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

/// Token identifying one registered blocking operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationToken(u64);

impl OperationToken {
    /// The raw token value, as passed to the engine.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

type OperationFn = Box<dyn FnOnce() + Send + 'static>;

/// Table of pending blocking-operation bodies, keyed by token.
pub struct BlockingOperations {
    next_token: AtomicU64,
    pending: Mutex<HashMap<u64, OperationFn>>,
}

impl fmt::Debug for BlockingOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingOperations").finish_non_exhaustive()
    }
}

impl Default for BlockingOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockingOperations {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_token: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Register an operation body and return the token to hand the engine.
    pub async fn register(&self, op: impl FnOnce() + Send + 'static) -> OperationToken {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let mut pending = self.pending.lock().await;
        pending.insert(token, Box::new(op));
        OperationToken(token)
    }

    /// Claim the operation body for `token`, removing it from the table.
    ///
    /// Returns `None` for unknown tokens and for tokens already claimed —
    /// each registration runs at most once.
    pub(crate) async fn take(&self, token: u64) -> Option<OperationFn> {
        let mut pending = self.pending.lock().await;
        pending.remove(&token)
    }

    /// Drop a registration the engine will never call back for.
    ///
    /// Returns whether the token was still registered.
    pub async fn cancel(&self, token: OperationToken) -> bool {
        let mut pending = self.pending.lock().await;
        pending.remove(&token.0).is_some()
    }

    /// Number of operations currently awaiting their engine callback.
    pub async fn pending_count(&self) -> usize {
        let pending = self.pending.lock().await;
        pending.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use super::*;

    #[tokio::test]
    async fn register_take_runs_once() {
        let ops = BlockingOperations::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let token = ops.register(move || flag.store(true, Ordering::SeqCst)).await;

        let op = ops.take(token.raw()).await.unwrap();
        op();
        assert!(ran.load(Ordering::SeqCst));

        // Second claim for the same token yields nothing.
        assert!(ops.take(token.raw()).await.is_none());
    }

    #[tokio::test]
    async fn tokens_are_distinct() {
        let ops = BlockingOperations::new();
        let a = ops.register(|| {}).await;
        let b = ops.register(|| {}).await;
        assert_ne!(a, b);
        assert_eq!(ops.pending_count().await, 2);
    }

    #[tokio::test]
    async fn cancel_removes_registration() {
        let ops = BlockingOperations::new();
        let token = ops.register(|| {}).await;
        assert!(ops.cancel(token).await);
        assert!(!ops.cancel(token).await);
        assert!(ops.take(token.raw()).await.is_none());
    }
}
