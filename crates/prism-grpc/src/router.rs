//! Inbound callback routing from the engine to the module.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use prism::{AssetQuery, ModuleInterface, RenderProgress, StartInfo, UiEvent};

use crate::blocking::BlockingOperations;
use crate::proto;

/// The `ModuleCallback` service implementation.
///
/// Each handler corresponds 1:1 to an event the engine may raise and is
/// pure forwarding: decode the request into plain arguments, call the
/// registered [`ModuleInterface`], encode the return value, reply OK.
/// The interface reference is captured at construction and never mutated
/// afterwards, so handlers read it without locking. The router imposes no
/// ordering of its own across concurrent inbound calls.
#[derive(Clone)]
pub struct CallbackRouter {
    interface: Arc<dyn ModuleInterface>,
    operations: Arc<BlockingOperations>,
}

impl std::fmt::Debug for CallbackRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRouter").finish_non_exhaustive()
    }
}

impl CallbackRouter {
    /// Create a router forwarding to `interface`.
    pub fn new(interface: Arc<dyn ModuleInterface>, operations: Arc<BlockingOperations>) -> Self {
        Self {
            interface,
            operations,
        }
    }
}

#[tonic::async_trait]
impl proto::module_callback_server::ModuleCallback for CallbackRouter {
    async fn start(
        &self,
        request: Request<proto::StartRequest>,
    ) -> Result<Response<proto::Empty>, Status> {
        let req = request.into_inner();
        tracing::debug!(engine_version = %req.engine_version, "module start");
        self.interface
            .start(StartInfo {
                engine_version: req.engine_version,
            })
            .await;
        Ok(Response::new(proto::Empty {}))
    }

    async fn stop(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::Empty>, Status> {
        tracing::debug!("module stop");
        self.interface.stop().await;
        Ok(Response::new(proto::Empty {}))
    }

    async fn is_ready(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::IsReadyResponse>, Status> {
        let ready = self.interface.is_ready().await;
        Ok(Response::new(proto::IsReadyResponse { ready }))
    }

    async fn ui_event(
        &self,
        request: Request<proto::UiEventRequest>,
    ) -> Result<Response<proto::Empty>, Status> {
        let req = request.into_inner();
        self.interface
            .ui_event(UiEvent {
                widget: req.widget_handle.into(),
                kind: req.kind,
                value: req.value,
            })
            .await;
        Ok(Response::new(proto::Empty {}))
    }

    async fn render_progress(
        &self,
        request: Request<proto::RenderProgressRequest>,
    ) -> Result<Response<proto::Empty>, Status> {
        let req = request.into_inner();
        self.interface
            .render_progress(RenderProgress {
                fraction: req.fraction,
                stage: req.stage,
            })
            .await;
        Ok(Response::new(proto::Empty {}))
    }

    async fn asset_missing(
        &self,
        request: Request<proto::AssetMissingRequest>,
    ) -> Result<Response<proto::AssetMissingResponse>, Status> {
        let req = request.into_inner();
        let resolved = self
            .interface
            .asset_missing(AssetQuery { path: req.path })
            .await;
        Ok(Response::new(proto::AssetMissingResponse {
            resolved_path: resolved.unwrap_or_default(),
        }))
    }

    async fn run_blocking_operation(
        &self,
        request: Request<proto::BlockingOperationRequest>,
    ) -> Result<Response<proto::BlockingOperationResponse>, Status> {
        let token = request.into_inner().token;
        let known_token = match self.operations.take(token).await {
            Some(op) => {
                // Operation bodies may block; keep them off the async workers.
                tokio::task::spawn_blocking(op)
                    .await
                    .map_err(|e| Status::internal(format!("blocking operation panicked: {e}")))?;
                true
            }
            None => {
                tracing::warn!(token, "blocking operation callback for unknown token");
                false
            }
        };
        Ok(Response::new(proto::BlockingOperationResponse {
            known_token,
        }))
    }
}
