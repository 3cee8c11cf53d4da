//! Module-side server lifecycle.
//!
//! A [`ModuleServer`] owns one Unix-domain-socket listener serving the
//! [`CallbackRouter`] and exposes the start/stop/wait contract the engine
//! expects from a module process: `start` blocks until the listener is
//! bound and serving (or has failed, or timed out), `stop` triggers
//! shutdown without blocking, and `wait_until_stopped` blocks until the
//! listener is fully released.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::UnixListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::transport::Server;

use prism::ModuleInterface;

use crate::blocking::BlockingOperations;
use crate::proto::module_callback_server::ModuleCallbackServer;
use crate::router::CallbackRouter;

/// Errors from the module server lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Stale-socket cleanup or bind failed. No serve task is left running.
    #[error("failed to bind module socket {path}: {source}")]
    Bind {
        /// The socket path that could not be bound.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
    /// The listener did not come up within the start timeout.
    #[error("module server did not start within {0:?}")]
    Timeout(Duration),
    /// The requested transition is not valid in the current state.
    #[error("invalid server state: {0}")]
    InvalidState(&'static str),
}

/// Module-side gRPC server bound to a Unix domain socket.
///
/// Lifecycle: NotStarted → (`start`) → Running or Failed;
/// Running → (`stop`) → Stopping → Stopped. An instance is single-use —
/// once `start` has succeeded it cannot be started again; restart means
/// constructing a fresh instance. `stop` before a successful `start`, and
/// a second `start`, both return [`ServerError::InvalidState`].
///
/// The engine socket path is recorded for the module's outbound calls
/// (see [`crate::EngineChannel`]) but is never dialed by this type.
pub struct ModuleServer {
    module_socket: PathBuf,
    engine_socket: PathBuf,
    start_timeout: Duration,
    operations: Arc<BlockingOperations>,
    serve_task: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
    serving: Option<watch::Receiver<bool>>,
    reaper: Option<JoinHandle<()>>,
    started: bool,
}

impl std::fmt::Debug for ModuleServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleServer")
            .field("module_socket", &self.module_socket)
            .field("engine_socket", &self.engine_socket)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl ModuleServer {
    /// Default bound on how long `start` waits for the listener to come up.
    pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a server that will bind `module_socket` and record
    /// `engine_socket` as the engine's address for outbound calls.
    pub fn new(module_socket: impl Into<PathBuf>, engine_socket: impl Into<PathBuf>) -> Self {
        Self {
            module_socket: module_socket.into(),
            engine_socket: engine_socket.into(),
            start_timeout: Self::DEFAULT_START_TIMEOUT,
            operations: Arc::new(BlockingOperations::new()),
            serve_task: None,
            shutdown: None,
            serving: None,
            reaper: None,
            started: false,
        }
    }

    /// Override the start timeout.
    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    /// The engine's listening address, for outbound calls.
    pub fn engine_socket(&self) -> &Path {
        &self.engine_socket
    }

    /// The socket path this server binds.
    pub fn module_socket(&self) -> &Path {
        &self.module_socket
    }

    /// The blocking-operation registry shared with the callback router.
    pub fn blocking_operations(&self) -> Arc<BlockingOperations> {
        Arc::clone(&self.operations)
    }

    /// Whether the serve loop is currently running.
    pub fn is_serving(&self) -> bool {
        self.serving.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Bind the module socket and start serving engine callbacks.
    ///
    /// Any stale socket file left by a previous crashed instance is removed
    /// first. The call returns only once the outcome is determined: `Ok`
    /// when the listener is bound and serving in the background, `Bind`
    /// when binding failed (the serve task is already joined), or `Timeout`
    /// when the listener did not come up in time (the serve task has been
    /// aborted and joined). No partial state survives a failure.
    pub async fn start(
        &mut self,
        interface: Arc<dyn ModuleInterface>,
    ) -> Result<(), ServerError> {
        if self.started {
            return Err(ServerError::InvalidState("start already called"));
        }

        remove_stale_socket(&self.module_socket).map_err(|source| ServerError::Bind {
            path: self.module_socket.clone(),
            source,
        })?;

        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), std::io::Error>>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (serving_tx, serving_rx) = watch::channel(false);

        let router = CallbackRouter::new(interface, Arc::clone(&self.operations));
        let socket = self.module_socket.clone();

        let task = tokio::spawn(async move {
            let listener = match UnixListener::bind(&socket) {
                Ok(listener) => listener,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = serving_tx.send(true);
            let _ = ready_tx.send(Ok(()));
            tracing::info!(socket = %socket.display(), "module server listening");

            let incoming = UnixListenerStream::new(listener);
            let result = Server::builder()
                .add_service(ModuleCallbackServer::new(router))
                .serve_with_incoming_shutdown(incoming, async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!("module server terminated: {e}");
            }

            // Release the socket path before announcing the stop, so that
            // anyone unblocked by the flag can immediately rebind it.
            let _ = std::fs::remove_file(&socket);
            let _ = serving_tx.send(false);
            tracing::info!(socket = %socket.display(), "module server stopped");
        });

        match tokio::time::timeout(self.start_timeout, ready_rx).await {
            Ok(Ok(Ok(()))) => {
                self.serve_task = Some(task);
                self.shutdown = Some(shutdown_tx);
                self.serving = Some(serving_rx);
                self.started = true;
                Ok(())
            }
            Ok(Ok(Err(source))) => {
                // Join the serve task before reporting, so the caller never
                // observes a leaked task after a failed start.
                let _ = task.await;
                tracing::error!(
                    socket = %self.module_socket.display(),
                    "failed to bind module socket: {source}"
                );
                Err(ServerError::Bind {
                    path: self.module_socket.clone(),
                    source,
                })
            }
            Ok(Err(_closed)) => {
                let _ = task.await;
                Err(ServerError::Bind {
                    path: self.module_socket.clone(),
                    source: std::io::Error::other("serve task exited before signaling readiness"),
                })
            }
            Err(_elapsed) => {
                task.abort();
                let _ = task.await;
                let _ = std::fs::remove_file(&self.module_socket);
                Err(ServerError::Timeout(self.start_timeout))
            }
        }
    }

    /// Trigger shutdown without blocking.
    ///
    /// Sends the shutdown signal and hands the serve task to a per-instance
    /// reaper task that joins it in the background; the caller returns
    /// immediately. Use [`ModuleServer::wait_until_stopped`] to block until
    /// teardown is complete.
    pub fn stop(&mut self) -> Result<(), ServerError> {
        let shutdown = self
            .shutdown
            .take()
            .ok_or(ServerError::InvalidState("server is not running"))?;
        let serve_task = self.serve_task.take();

        let _ = shutdown.send(());
        self.reaper = Some(tokio::spawn(async move {
            if let Some(task) = serve_task {
                let _ = task.await;
            }
        }));
        Ok(())
    }

    /// Block until the serve loop has returned and the listener is fully
    /// released.
    ///
    /// After this returns, the socket file has been removed and the path
    /// can be bound again. If the server was never started this returns
    /// immediately.
    pub async fn wait_until_stopped(&mut self) {
        if let Some(serving) = self.serving.as_mut() {
            // wait_for also returns if the sender is dropped, which only
            // happens after the serve task has cleared the flag.
            let _ = serving.wait_for(|serving| !*serving).await;
        }
        if let Some(reaper) = self.reaper.take() {
            let _ = reaper.await;
        }
        if let Some(task) = self.serve_task.take() {
            let _ = task.await;
        }
    }
}

/// Remove a stale socket file from a previous instance. Missing is fine.
fn remove_stale_socket(path: &Path) -> Result<(), std::io::Error> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(socket = %path.display(), "removed stale socket file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
