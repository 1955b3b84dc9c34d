use roomfit_core::{DesignId, RoomId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RfError {
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid layout file: {0}")]
    Layout(#[from] serde_json::Error),

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Design not found: {0}")]
    DesignNotFound(DesignId),

    #[error("Design {design} belongs to room {actual}, not room {requested}")]
    DesignRoomMismatch {
        design: DesignId,
        requested: RoomId,
        actual: RoomId,
    },

    #[error("Invalid layout: {0}")]
    Studio(#[from] roomfit_core::StudioError),

    #[error("Backend error: {0}")]
    Client(#[from] roomfit_client::ClientError),
}
