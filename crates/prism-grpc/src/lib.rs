//! Prism module gRPC transport
//!
//! Everything a Prism module process needs to talk to the engine and be
//! talked to: the module-side server bound to a Unix domain socket, the
//! callback router that forwards engine events to the registered
//! [`ModuleInterface`](prism::ModuleInterface), the generic invoke channel
//! for outbound calls, and typed proxies over the engine's object model.
//!
//! # Architecture
//!
//! Each module instance uses two Unix sockets: one the module binds and the
//! engine calls back on, one the engine listens on for the module's own
//! calls. Neither carries TLS or authentication.
//!
//! ```text
//! Engine                                      Module
//! │                                              │
//! │  Start / IsReady / UiEvent / ...             │
//! │ ───────────── module socket ───────────────> │  CallbackRouter
//! │                                              │    -> ModuleInterface
//! │                                              │
//! │            PinCount / TableBytes / ...       │
//! │ <───────────── engine socket ─────────────── │  EngineChannel
//! │                                              │    <- typed proxies
//! ```
//!
//! The server start/stop/wait lifecycle is owned by [`ModuleServer`]; see
//! its docs for the handshake and shutdown contract.

pub mod proto {
    #![allow(missing_docs)]
    #![allow(clippy::doc_markdown)]
    tonic::include_proto!("prism.v1");
}

mod blocking;
mod channel;
pub mod proxy;
mod router;
mod server;

pub use blocking::{BlockingOperations, OperationToken};
pub use channel::EngineChannel;
pub use router::CallbackRouter;
pub use server::{ModuleServer, ServerError};

// Re-export the generated service entry points for embedders and tests.
pub use proto::{
    engine_api_server::{EngineApi, EngineApiServer},
    module_callback_client::ModuleCallbackClient,
    module_callback_server::ModuleCallbackServer,
};
