//! Module data persistence.

use prism::ApiError;

use crate::channel::EngineChannel;
use crate::proto;

const LOAD_MODULE_DATA: &str = "/prism.v1.EngineApi/LoadModuleData";
const SAVE_MODULE_DATA: &str = "/prism.v1.EngineApi/SaveModuleData";

/// Keyed blob storage the engine persists on a module's behalf, surviving
/// module restarts. Not handle-based: the key is chosen by the module.
#[derive(Debug, Clone)]
pub struct ModuleData {
    channel: EngineChannel,
    key: String,
}

impl ModuleData {
    /// Access the blob stored under `key`.
    pub fn new(channel: EngineChannel, key: impl Into<String>) -> Self {
        Self {
            channel,
            key: key.into(),
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored blob. An absent key yields an empty blob.
    pub async fn load(&self) -> Result<Vec<u8>, ApiError> {
        let resp: proto::ModuleDataLoadResponse = self
            .channel
            .unary(
                LOAD_MODULE_DATA,
                proto::ModuleDataLoadRequest {
                    key: self.key.clone(),
                },
            )
            .await?;
        Ok(resp.data)
    }

    /// Store `data` under this key, replacing any previous blob.
    pub async fn save(&self, data: &[u8]) -> Result<(), ApiError> {
        let _: proto::Empty = self
            .channel
            .unary(
                SAVE_MODULE_DATA,
                proto::ModuleDataSaveRequest {
                    key: self.key.clone(),
                    data: data.to_vec(),
                },
            )
            .await?;
        Ok(())
    }
}
