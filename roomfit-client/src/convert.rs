use roomfit_core::{DesignItem, RoomId, Snapshot, ValidationError};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{FitnessCheckRequest, SaveDesignRequest};

fn design_items(snapshot: &Snapshot) -> Vec<DesignItem> {
    snapshot.iter().map(|item| item.to_design_item()).collect()
}

/// Builds the fitness-check body. An empty snapshot is rejected.
pub fn build_fitness_request(
    room_id: RoomId,
    snapshot: &Snapshot,
) -> Result<FitnessCheckRequest, ClientError> {
    if snapshot.is_empty() {
        return Err(ValidationError::EmptyLayout.into());
    }
    Ok(FitnessCheckRequest {
        room_id,
        furniture_items: design_items(snapshot),
    })
}

/// Builds the save body. The name is trimmed and must not be blank.
pub fn build_save_request(
    room_id: RoomId,
    name: &str,
    snapshot: &Snapshot,
) -> Result<SaveDesignRequest, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingDesignName.into());
    }
    if snapshot.is_empty() {
        return Err(ValidationError::EmptyLayout.into());
    }
    Ok(SaveDesignRequest {
        room_id,
        name: name.to_string(),
        furniture_items: design_items(snapshot),
    })
}

/// Decodes a success body against its schema.
pub fn parse_body<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Malformed { status, source })
}

/// Pulls a human-readable message out of an error body.
///
/// Understands FastAPI's `{"detail": "..."}` and `{"detail": [{"msg": ...}]}`
/// shapes as well as `{"error": {"message": ...}}`, falling back to the raw
/// text.
pub fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if let Some(detail) = value.get("detail") {
            match detail {
                Value::String(s) => return s.clone(),
                Value::Array(entries) => {
                    let msgs: Vec<&str> = entries
                        .iter()
                        .filter_map(|e| e.get("msg").and_then(Value::as_str))
                        .collect();
                    if !msgs.is_empty() {
                        return msgs.join("; ");
                    }
                }
                _ => {}
            }
        }
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "Unknown error".to_string()
    } else {
        text.to_string()
    }
}
