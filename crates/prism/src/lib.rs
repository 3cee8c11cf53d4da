//! Prism module SDK: core object model
//!
//! A Prism module is a separate process that the render engine talks to over
//! gRPC on Unix domain sockets. This crate holds the transport-independent
//! pieces of that contract: remote object handles, the [`ModuleInterface`]
//! a module implements to receive engine callbacks, and the error taxonomy
//! shared by every call into the engine.
//!
//! The transport itself (the module-side server, the callback router, and
//! the typed proxies over the engine API) lives in the `prism-grpc` crate.

mod error;
mod handle;
mod interface;

pub use error::ApiError;
pub use handle::ObjectHandle;
pub use interface::{AssetQuery, ModuleInterface, RenderProgress, StartInfo, UiEvent};
