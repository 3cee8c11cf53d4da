//! Client channel to the engine's API socket.
//!
//! The engine API surface is one unary RPC per engine method, so instead of
//! a generated client per service this module exposes a single generic
//! invoke primitive: [`EngineChannel::unary`] takes the method path and the
//! request/response message types and performs the call. The typed proxies
//! in [`crate::proxy`] are thin wrappers over it.

use std::path::Path;

use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint, Uri};
use tonic::{Code, Status};
use tower::service_fn;

use prism::ApiError;

/// Connection to the engine's Unix domain socket.
///
/// Cheap to clone; all clones share the underlying HTTP/2 connection.
#[derive(Clone)]
pub struct EngineChannel {
    inner: tonic::client::Grpc<Channel>,
}

impl std::fmt::Debug for EngineChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineChannel").finish_non_exhaustive()
    }
}

impl EngineChannel {
    /// Dial the engine's API socket.
    ///
    /// The socket is dialed lazily per the underlying transport, but a
    /// failed initial connection surfaces here as [`ApiError::Connect`].
    pub async fn connect(socket_path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = socket_path.as_ref().to_path_buf();
        // The endpoint URI is required by the builder but never resolved;
        // the connector dials the Unix socket instead.
        let channel = Endpoint::try_from("http://[::1]:0")
            .map_err(|e| ApiError::Connect(e.to_string()))?
            .connect_with_connector(service_fn(move |_: Uri| {
                let path = path.clone();
                async move {
                    let stream = UnixStream::connect(path).await?;
                    Ok::<_, std::io::Error>(TokioIo::new(stream))
                }
            }))
            .await
            .map_err(|e| ApiError::Connect(e.to_string()))?;

        Ok(Self {
            inner: tonic::client::Grpc::new(channel),
        })
    }

    /// Invoke a unary engine method.
    ///
    /// `path` is the full gRPC method path, e.g.
    /// `"/prism.v1.EngineApi/PinCount"`. This is the escape hatch for engine
    /// methods the typed proxies do not cover.
    pub async fn unary<Req, Resp>(&self, path: &'static str, request: Req) -> Result<Resp, ApiError>
    where
        Req: prost::Message + 'static,
        Resp: prost::Message + Default + 'static,
    {
        let mut grpc = self.inner.clone();
        grpc.ready().await.map_err(|e| ApiError::Rpc {
            code: Code::Unknown as i32,
            message: format!("engine channel not ready: {e}"),
        })?;

        let codec: tonic::codec::ProstCodec<Req, Resp> = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static(path);
        grpc.unary(tonic::Request::new(request), path, codec)
            .await
            .map(tonic::Response::into_inner)
            .map_err(status_to_error)
    }
}

/// Translate a gRPC status into the SDK error taxonomy.
///
/// Invalid-argument is the one distinguished class; everything else keeps
/// only its numeric code and message.
fn status_to_error(status: Status) -> ApiError {
    match status.code() {
        Code::InvalidArgument => ApiError::InvalidArgument(status.message().to_string()),
        code => ApiError::Rpc {
            code: code as i32,
            message: status.message().to_string(),
        },
    }
}
