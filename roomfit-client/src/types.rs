use roomfit_core::{DesignItem, RoomId};
use serde::Serialize;

/// Body of `POST /check-multiple-fitness`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessCheckRequest {
    pub room_id: RoomId,
    /// One entry per placement, in store order.
    pub furniture_items: Vec<DesignItem>,
}

/// Body of `POST /save-design`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveDesignRequest {
    pub room_id: RoomId,
    pub name: String,
    pub furniture_items: Vec<DesignItem>,
}
