//! Engine-level calls not tied to an object handle.

use prism::{ApiError, ObjectHandle};

use crate::blocking::OperationToken;
use crate::channel::EngineChannel;
use crate::proto;

const BEGIN_BLOCKING_OPERATION: &str = "/prism.v1.EngineApi/BeginBlockingOperation";
const DESTROY_OBJECT: &str = "/prism.v1.EngineApi/DestroyObject";

/// Root proxy for engine-level calls.
#[derive(Debug, Clone)]
pub struct EngineProxy {
    channel: EngineChannel,
}

impl EngineProxy {
    /// Wrap an engine channel.
    pub fn new(channel: EngineChannel) -> Self {
        Self { channel }
    }

    /// Announce a blocking operation to the engine.
    ///
    /// `token` must come from
    /// [`BlockingOperations::register`](crate::BlockingOperations::register);
    /// the engine later calls back `RunBlockingOperation` with it to run
    /// the registered body.
    pub async fn begin_blocking_operation(
        &self,
        token: OperationToken,
        description: &str,
    ) -> Result<(), ApiError> {
        let _: proto::Empty = self
            .channel
            .unary(
                BEGIN_BLOCKING_OPERATION,
                proto::BeginBlockingOperationRequest {
                    token: token.raw(),
                    description: description.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Destroy an engine-side object for which no typed proxy is held.
    pub async fn destroy_object(&self, handle: ObjectHandle) -> Result<(), ApiError> {
        let _: proto::Empty = self
            .channel
            .unary(
                DESTROY_OBJECT,
                proto::ObjectRef {
                    handle: handle.raw(),
                },
            )
            .await?;
        Ok(())
    }
}
