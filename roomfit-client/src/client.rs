use roomfit_core::{
    Design, DesignId, FitnessReport, FurnitureTemplate, NewRoom, Room, RoomId, Snapshot,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::convert::{build_fitness_request, build_save_request, error_message, parse_body};
use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client for the roomfit backend.
#[derive(Debug, Clone)]
pub struct RoomfitClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for RoomfitClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomfitClient {
    /// Creates a client for the default local backend.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for the backend at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Sends a request and returns the raw success body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, Vec<u8>), ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::Service {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok((status.as_u16(), body.to_vec()))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let (status, body) = self.send(request).await?;
        parse_body(status, &body)
    }

    /// `GET /furniture`
    #[instrument(skip(self))]
    pub async fn list_furniture(&self) -> Result<Vec<FurnitureTemplate>, ClientError> {
        let catalog: Vec<FurnitureTemplate> =
            self.send_json(self.http.get(self.url("furniture"))).await?;
        debug!(count = catalog.len(), "loaded furniture catalog");
        Ok(catalog)
    }

    /// `GET /rooms`
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<Room>, ClientError> {
        self.send_json(self.http.get(self.url("rooms"))).await
    }

    /// `POST /rooms`, after validating the draft locally.
    #[instrument(skip(self, room), fields(name = %room.name))]
    pub async fn create_room(&self, room: &NewRoom) -> Result<Room, ClientError> {
        room.validate()?;
        self.send_json(self.http.post(self.url("rooms")).json(room))
            .await
    }

    /// `POST /check-multiple-fitness`
    ///
    /// An empty snapshot fails with a validation error without contacting
    /// the service.
    #[instrument(skip(self, snapshot), fields(items = snapshot.len()))]
    pub async fn check_fitness(
        &self,
        room_id: RoomId,
        snapshot: &Snapshot,
    ) -> Result<FitnessReport, ClientError> {
        let body = build_fitness_request(room_id, snapshot)?;

        debug!("Sending fitness check");

        let report: FitnessReport = self
            .send_json(self.http.post(self.url("check-multiple-fitness")).json(&body))
            .await?;

        debug!(all_fits = report.all_fits, results = report.results.len(), "Received fitness report");
        Ok(report)
    }

    /// `POST /save-design`
    #[instrument(skip(self, snapshot), fields(items = snapshot.len()))]
    pub async fn save_design(
        &self,
        room_id: RoomId,
        name: &str,
        snapshot: &Snapshot,
    ) -> Result<Design, ClientError> {
        let body = build_save_request(room_id, name, snapshot)?;
        self.send_json(self.http.post(self.url("save-design")).json(&body))
            .await
    }

    /// `GET /saved-designs`
    #[instrument(skip(self))]
    pub async fn list_designs(&self) -> Result<Vec<Design>, ClientError> {
        self.send_json(self.http.get(self.url("saved-designs"))).await
    }

    /// `DELETE /saved-designs/{id}`. The response body is ignored.
    #[instrument(skip(self))]
    pub async fn delete_design(&self, id: DesignId) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("saved-designs/{}", id))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RoomfitClient::new();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_custom_base_url() {
        let client = RoomfitClient::with_base_url("http://10.0.0.5:8000/");
        assert_eq!(client.base_url, "http://10.0.0.5:8000/");
        assert_eq!(client.url("/furniture"), "http://10.0.0.5:8000/furniture");
        assert_eq!(client.url("saved-designs/3"), "http://10.0.0.5:8000/saved-designs/3");
    }

    #[tokio::test]
    #[ignore = "requires a running backend at ROOMFIT_API_URL"]
    async fn test_live_api() {
        let base_url = std::env::var("ROOMFIT_API_URL").expect("ROOMFIT_API_URL not set");
        let client = RoomfitClient::with_base_url(base_url);

        let catalog = client.list_furniture().await;
        assert!(catalog.is_ok());

        let rooms = client.list_rooms().await;
        assert!(rooms.is_ok());
    }
}
