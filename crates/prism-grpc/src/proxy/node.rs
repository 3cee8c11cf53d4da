//! Node proxies and pin metadata.

use prism::{ApiError, ObjectHandle};

use crate::channel::EngineChannel;
use crate::proto;

const PIN_COUNT: &str = "/prism.v1.EngineApi/PinCount";
const PIN_INFO: &str = "/prism.v1.EngineApi/PinInfo";
const DESTROY_OBJECT: &str = "/prism.v1.EngineApi/DestroyObject";

/// The value family a pin carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    /// Boolean toggle.
    Bool,
    /// Integer scalar.
    Int,
    /// Floating-point scalar.
    Float,
    /// RGB color.
    Color,
    /// Texture input.
    Texture,
    /// Connection to another node.
    Node,
    /// A kind this SDK build does not know about.
    Other(u32),
}

impl From<u32> for PinKind {
    fn from(raw: u32) -> Self {
        match raw {
            0 => PinKind::Bool,
            1 => PinKind::Int,
            2 => PinKind::Float,
            3 => PinKind::Color,
            4 => PinKind::Texture,
            5 => PinKind::Node,
            other => PinKind::Other(other),
        }
    }
}

/// Static metadata describing one input pin of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PinInfo {
    /// Internal pin name.
    pub name: String,
    /// User-visible label.
    pub label: String,
    /// Value family of the pin.
    pub kind: PinKind,
    /// Longer description shown in the UI.
    pub description: String,
}

/// Proxy for a node in the engine's scene graph.
#[derive(Debug, Clone)]
pub struct NodeProxy {
    channel: EngineChannel,
    handle: ObjectHandle,
}

impl NodeProxy {
    /// Wrap a node handle received from the engine.
    pub fn from_handle(channel: EngineChannel, handle: ObjectHandle) -> Self {
        Self { channel, handle }
    }

    /// The remote handle this proxy wraps.
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Number of input pins on this node.
    pub async fn pin_count(&self) -> Result<u32, ApiError> {
        let resp: proto::PinCountResponse = self
            .channel
            .unary(
                PIN_COUNT,
                proto::PinCountRequest {
                    node: self.handle.raw(),
                },
            )
            .await?;
        Ok(resp.count)
    }

    /// Metadata for the pin at `index`.
    pub async fn pin_info(&self, index: u32) -> Result<PinInfo, ApiError> {
        let resp: proto::PinInfoResponse = self
            .channel
            .unary(
                PIN_INFO,
                proto::PinInfoRequest {
                    node: self.handle.raw(),
                    index,
                },
            )
            .await?;
        Ok(PinInfo {
            name: resp.name,
            label: resp.label,
            kind: resp.kind.into(),
            description: resp.description,
        })
    }

    /// Destroy the engine-side node. The proxy is consumed; other proxies
    /// holding the same handle become stale.
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

impl PartialEq for NodeProxy {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for NodeProxy {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_kind_maps_unknown_values() {
        assert_eq!(PinKind::from(2), PinKind::Float);
        assert_eq!(PinKind::from(99), PinKind::Other(99));
    }
}
