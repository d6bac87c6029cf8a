// Backend client
//
// The BackendClient trait is the seam between the store and the detection
// backend. HttpBackendClient is the reqwest implementation; tests use
// memory::MockBackendClient.
//
// Every non-success response is turned into ClientError::Api carrying the
// HTTP status, whether or not the error body could be parsed.

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::camera::{Camera, CameraPatch, CameraStatus, CameraStatusReport};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::violation::DetectionEvent;

/// Operations the dashboard performs against the detection backend
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Register a camera. The camera is always submitted as `active`.
    async fn add_camera(&self, camera: &Camera) -> Result<(), ClientError>;

    /// Send a partial camera update
    async fn update_camera(&self, id: Uuid, patch: &CameraPatch) -> Result<(), ClientError>;

    /// Remove a camera
    async fn delete_camera(&self, id: Uuid) -> Result<(), ClientError>;

    /// Probe a camera's liveness
    async fn check_status(&self, id: Uuid) -> Result<CameraStatusReport, ClientError>;

    /// URL of the camera's MJPEG stream. No network call.
    fn stream_url(&self, id: Uuid) -> String;

    /// Fetch recorded violations
    async fn list_violations(&self) -> Result<Vec<DetectionEvent>, ClientError>;
}

/// reqwest-backed BackendClient
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from configuration, applying the request timeout if set
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Succeed on 2xx, otherwise build an Api error from the response body
    async fn expect_success(response: Response, fallback: &str) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::api(
            status.as_u16(),
            error_message(&body).unwrap_or_else(|| fallback.to_string()),
        ))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::decode(e.to_string()))
    }
}

/// Extract `message` from a JSON error body
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn add_camera(&self, camera: &Camera) -> Result<(), ClientError> {
        debug!(camera_id = %camera.id, "Adding camera");

        let mut body = camera.clone();
        body.status = CameraStatus::Active;

        let response = self.http.post(self.url("/cameras")).json(&body).send().await?;
        Self::expect_success(response, "Failed to add camera").await?;
        Ok(())
    }

    async fn update_camera(&self, id: Uuid, patch: &CameraPatch) -> Result<(), ClientError> {
        debug!(camera_id = %id, "Updating camera");

        let response = self
            .http
            .put(self.url(&format!("/cameras/{}", id)))
            .json(patch)
            .send()
            .await?;
        Self::expect_success(response, "Failed to update camera").await?;
        Ok(())
    }

    async fn delete_camera(&self, id: Uuid) -> Result<(), ClientError> {
        debug!(camera_id = %id, "Deleting camera");

        let response = self
            .http
            .delete(self.url(&format!("/cameras/{}", id)))
            .send()
            .await?;
        Self::expect_success(response, "Failed to delete camera").await?;
        Ok(())
    }

    async fn check_status(&self, id: Uuid) -> Result<CameraStatusReport, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/cameras/{}/status", id)))
            .send()
            .await?;
        let response = Self::expect_success(response, "Failed to check camera status").await?;
        let report: CameraStatusReport = Self::read_json(response).await?;

        debug!(camera_id = %id, status = %report.status, "Camera status checked");
        Ok(report)
    }

    fn stream_url(&self, id: Uuid) -> String {
        self.url(&format!("/stream/{}", id))
    }

    async fn list_violations(&self) -> Result<Vec<DetectionEvent>, ClientError> {
        let response = self.http.get(self.url("/violations")).send().await?;
        let response = Self::expect_success(response, "Failed to load violations").await?;
        let events: Vec<DetectionEvent> = Self::read_json(response).await?;

        debug!(count = events.len(), "Violations loaded");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"status":"error","message":"camera offline"}"#),
            Some("camera offline".to_string())
        );
        assert_eq!(error_message(r#"{"message":""}"#), None);
        assert_eq!(error_message(r#"{"error":"x"}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_stream_url_is_derived_from_id() {
        let client = HttpBackendClient::new("http://localhost:5000/api/");
        let id = Uuid::now_v7();
        assert_eq!(
            client.stream_url(id),
            format!("http://localhost:5000/api/stream/{}", id)
        );
    }
}
