//! The callback interface a module implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::handle::ObjectHandle;

/// Information passed to a module when the engine activates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInfo {
    /// Version string of the engine hosting the module.
    pub engine_version: String,
}

/// A user-interface event raised by one of the module's widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiEvent {
    /// Handle of the widget the event originated from.
    pub widget: ObjectHandle,
    /// Event kind, e.g. `"clicked"` or `"value-changed"`.
    pub kind: String,
    /// Widget value at the time of the event, stringified by the engine.
    pub value: String,
}

/// Progress notification for an in-flight render job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderProgress {
    /// Completed fraction in `0.0..=1.0`.
    pub fraction: f64,
    /// Human-readable stage description.
    pub stage: String,
}

/// Query raised when the engine cannot locate an asset a scene references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetQuery {
    /// The path the engine failed to resolve.
    pub path: String,
}

/// The set of callbacks a module exposes to the engine.
///
/// `start`, `stop` and `is_ready` are the required lifecycle capabilities.
/// The remaining handlers are optional events; their default bodies ignore
/// the event, and the router answers the engine with success either way —
/// leaving a handler unimplemented is never an error.
///
/// One implementation is registered per module process, at server start,
/// and stays registered for the lifetime of the listener.
#[async_trait]
pub trait ModuleInterface: Send + Sync {
    /// Called once when the engine activates the module.
    async fn start(&self, info: StartInfo);

    /// Called when the engine deactivates the module.
    async fn stop(&self);

    /// Readiness probe; the engine polls this before routing work here.
    async fn is_ready(&self) -> bool;

    /// A widget owned by this module raised an event.
    async fn ui_event(&self, _event: UiEvent) {}

    /// The engine reported progress on a render job.
    async fn render_progress(&self, _progress: RenderProgress) {}

    /// The engine failed to locate an asset. Return a substitute path to
    /// resolve it, or `None` to let the engine fall back to its default.
    async fn asset_missing(&self, _query: AssetQuery) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    #[async_trait]
    impl ModuleInterface for Minimal {
        async fn start(&self, _info: StartInfo) {}
        async fn stop(&self) {}
        async fn is_ready(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn default_handlers_are_no_ops() {
        let module = Minimal;
        module
            .ui_event(UiEvent {
                widget: ObjectHandle::new(1),
                kind: "clicked".to_string(),
                value: String::new(),
            })
            .await;
        module
            .render_progress(RenderProgress {
                fraction: 0.5,
                stage: "shading".to_string(),
            })
            .await;
        let resolved = module
            .asset_missing(AssetQuery {
                path: "/textures/missing.exr".to_string(),
            })
            .await;
        assert_eq!(resolved, None);
    }
}
