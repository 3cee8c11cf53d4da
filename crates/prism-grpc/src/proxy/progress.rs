//! Progress bar proxy.

use prism::{ApiError, ObjectHandle};

use crate::channel::EngineChannel;
use crate::proto;

const CREATE_PROGRESS_BAR: &str = "/prism.v1.EngineApi/CreateProgressBar";
const UPDATE_PROGRESS_BAR: &str = "/prism.v1.EngineApi/UpdateProgressBar";
const DESTROY_OBJECT: &str = "/prism.v1.EngineApi/DestroyObject";

/// Proxy for a progress bar shown in the engine's UI.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    channel: EngineChannel,
    handle: ObjectHandle,
}

impl ProgressBar {
    /// Ask the engine to create a new progress bar.
    pub async fn create(channel: EngineChannel) -> Result<Self, ApiError> {
        let resp: proto::ObjectRef = channel
            .unary(CREATE_PROGRESS_BAR, proto::Empty {})
            .await?;
        Ok(Self {
            channel,
            handle: ObjectHandle::new(resp.handle),
        })
    }

    /// The remote handle this proxy wraps.
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Update the displayed fraction (`0.0..=1.0`) and text.
    pub async fn update(&self, fraction: f64, text: &str) -> Result<(), ApiError> {
        let _: proto::Empty = self
            .channel
            .unary(
                UPDATE_PROGRESS_BAR,
                proto::ProgressUpdateRequest {
                    bar: self.handle.raw(),
                    fraction,
                    text: text.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Remove the progress bar from the engine UI, consuming the proxy.
    pub async fn destroy(self) -> Result<(), ApiError> {
        let _: proto::Empty = self
            .channel
            .unary(
                DESTROY_OBJECT,
                proto::ObjectRef {
                    handle: self.handle.raw(),
                },
            )
            .await?;
        Ok(())
    }
}

impl PartialEq for ProgressBar {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for ProgressBar {}
