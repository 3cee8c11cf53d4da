//! Demo Prism module
//!
//! A minimal module executable: it binds the module socket, answers the
//! engine's lifecycle callbacks, and counts the events it receives. The
//! engine launches module binaries with the two socket flags below.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use prism::{AssetQuery, ModuleInterface, RenderProgress, StartInfo, UiEvent};
use prism_grpc::ModuleServer;

/// Demo Prism module - counts engine callbacks
#[derive(Parser, Debug)]
#[command(name = "prism-module")]
#[command(about = "Demo module for the Prism render engine")]
struct Args {
    /// Socket the engine listens on, for the module's outbound calls
    #[arg(long = "serverSocket")]
    server_socket: PathBuf,

    /// Socket this module binds for engine callbacks
    #[arg(long = "moduleSocket")]
    module_socket: PathBuf,
}

/// Event counters dumped when the engine stops the module.
#[derive(Debug, Default, Serialize)]
struct Counters {
    ui_events: u64,
    progress_events: u64,
    asset_queries: u64,
}

#[derive(Default)]
struct DemoModule {
    ready: AtomicBool,
    ui_events: AtomicU64,
    progress_events: AtomicU64,
    asset_queries: AtomicU64,
}

#[async_trait]
impl ModuleInterface for DemoModule {
    async fn start(&self, info: StartInfo) {
        tracing::info!(engine_version = %info.engine_version, "module started");
        self.ready.store(true, Ordering::SeqCst);
    }

    async fn stop(&self) {
        self.ready.store(false, Ordering::SeqCst);
        let counters = Counters {
            ui_events: self.ui_events.load(Ordering::SeqCst),
            progress_events: self.progress_events.load(Ordering::SeqCst),
            asset_queries: self.asset_queries.load(Ordering::SeqCst),
        };
        match serde_json::to_string(&counters) {
            Ok(json) => tracing::info!(counters = %json, "module stopped"),
            Err(e) => tracing::warn!("failed to serialize counters: {e}"),
        }
    }

    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn ui_event(&self, event: UiEvent) {
        self.ui_events.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(widget = %event.widget, kind = %event.kind, "ui event");
    }

    async fn render_progress(&self, progress: RenderProgress) {
        self.progress_events.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(fraction = progress.fraction, stage = %progress.stage, "render progress");
    }

    async fn asset_missing(&self, query: AssetQuery) -> Option<String> {
        self.asset_queries.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %query.path, "asset missing");
        None
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr; stdout stays free for the engine.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    let mut server = ModuleServer::new(&args.module_socket, &args.server_socket);
    server.start(Arc::new(DemoModule::default())).await?;
    tracing::info!(
        module_socket = %args.module_socket.display(),
        server_socket = %args.server_socket.display(),
        "module serving"
    );

    shutdown_signal().await;
    tracing::info!("shutting down");
    server.stop()?;
    server.wait_until_stopped().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
