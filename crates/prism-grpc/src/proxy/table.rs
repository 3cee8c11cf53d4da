//! Binary table and group proxies.

use prism::{ApiError, ObjectHandle};

use crate::channel::EngineChannel;
use crate::proto;

const TABLE_BYTES: &str = "/prism.v1.EngineApi/TableBytes";
const GROUP_ITEMS: &str = "/prism.v1.EngineApi/GroupItems";
const DESTROY_OBJECT: &str = "/prism.v1.EngineApi/DestroyObject";

/// Proxy for a binary table: id-keyed blob entries owned by the engine.
#[derive(Debug, Clone)]
pub struct BinaryTable {
    channel: EngineChannel,
    handle: ObjectHandle,
}

impl BinaryTable {
    /// Wrap a table handle received from the engine.
    pub fn from_handle(channel: EngineChannel, handle: ObjectHandle) -> Self {
        Self { channel, handle }
    }

    /// The remote handle this proxy wraps.
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Raw bytes of the entry with the given id.
    pub async fn bytes(&self, id: u32) -> Result<Vec<u8>, ApiError> {
        let resp: proto::TableBytesResponse = self
            .channel
            .unary(
                TABLE_BYTES,
                proto::TableBytesRequest {
                    table: self.handle.raw(),
                    id,
                },
            )
            .await?;
        Ok(resp.data)
    }

    /// Destroy the engine-side table, consuming the proxy.
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

impl PartialEq for BinaryTable {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for BinaryTable {}

/// Proxy for a binary group: an ordered collection of engine objects,
/// typically tables or nested groups.
#[derive(Debug, Clone)]
pub struct BinaryGroup {
    channel: EngineChannel,
    handle: ObjectHandle,
}

impl BinaryGroup {
    /// Wrap a group handle received from the engine.
    pub fn from_handle(channel: EngineChannel, handle: ObjectHandle) -> Self {
        Self { channel, handle }
    }

    /// The remote handle this proxy wraps.
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Handles of the group's items, in engine order.
    pub async fn items(&self) -> Result<Vec<ObjectHandle>, ApiError> {
        let resp: proto::GroupItemsResponse = self
            .channel
            .unary(
                GROUP_ITEMS,
                proto::GroupItemsRequest {
                    group: self.handle.raw(),
                },
            )
            .await?;
        Ok(resp.items.into_iter().map(ObjectHandle::new).collect())
    }

    /// Wrap one of this group's items as a table proxy.
    pub fn table(&self, handle: ObjectHandle) -> BinaryTable {
        BinaryTable::from_handle(self.channel.clone(), handle)
    }

    /// Destroy the engine-side group, consuming the proxy.
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

impl PartialEq for BinaryGroup {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for BinaryGroup {}
