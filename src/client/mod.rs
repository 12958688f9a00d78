//! Remote access client for the cage backend.
//!
//! A thin request/response mapping onto the REST contract. Every failure, including
//! transport errors and undecodable bodies, is normalized into [`ClientError`] before it
//! leaves this module. No retries happen here.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    AssignRequest, Cage, CageActionResponse, CageId, GridSnapshot, Professor, ProfessorId,
    ProfessorListResponse, Rack, RackId, RackListResponse, ReleaseRequest,
};

/// Status used when no HTTP response was received at all.
const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Normalized failure surfaced to the engine and coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status_code})")]
pub struct ClientError {
    pub status_code: u16,
    pub message: String,
    /// True iff the backend rejected a write because the version token was stale
    pub is_conflict: bool,
}

/// Coarse failure category used for user-facing handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stale version on write; recovered by reconciliation
    Conflict,
    /// Validation or other 4xx rejection; shown verbatim
    Client,
    /// Network or server fault
    Transient,
}

impl ClientError {
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            is_conflict: status_code == StatusCode::CONFLICT.as_u16(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::from_status(TRANSPORT_FAILURE_STATUS, message)
    }

    pub fn kind(&self) -> ErrorKind {
        if self.is_conflict {
            ErrorKind::Conflict
        } else if (400..500).contains(&self.status_code) {
            ErrorKind::Client
        } else {
            ErrorKind::Transient
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!(error = %err, "cage api transport failure");
        match err.status() {
            Some(status) => ClientError::from_status(status.as_u16(), err.to_string()),
            None => ClientError::transport(err.to_string()),
        }
    }
}

/// Backend operations the sync engine and write coordinator depend on.
#[async_trait]
pub trait CageApi: Send + Sync {
    /// Full grid of one rack.
    async fn fetch_grid(&self, rack_id: RackId) -> Result<GridSnapshot, ClientError>;

    /// Assign a cage, fenced by `expected_version`.
    async fn assign(
        &self,
        cage_id: CageId,
        professor_id: ProfessorId,
        expected_version: i64,
    ) -> Result<Cage, ClientError>;

    /// Release a cage, fenced by `expected_version`.
    async fn release(&self, cage_id: CageId, expected_version: i64) -> Result<Cage, ClientError>;

    async fn list_racks(&self) -> Result<Vec<Rack>, ClientError>;

    async fn list_professors(&self) -> Result<Vec<Professor>, ClientError>;
}

/// HTTP implementation of [`CageApi`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCageClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCageClient {
    /// Create a client for a backend rooted at `base_url` (without the `/api` suffix).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Download link for the usage report covering `start_date..=end_date`.
    pub fn report_url(&self, start_date: NaiveDate, end_date: NaiveDate) -> String {
        format!(
            "{}?start_date={}&end_date={}",
            self.url("/reports/download"),
            start_date.format("%Y-%m-%d"),
            end_date.format("%Y-%m-%d")
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn cage_action<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Cage, ClientError> {
        let response: CageActionResponse = self.post_json(path, body).await?;
        if !response.success {
            return Err(ClientError::from_status(
                StatusCode::OK.as_u16(),
                response.message,
            ));
        }
        Ok(response.cage)
    }
}

#[async_trait]
impl CageApi for HttpCageClient {
    async fn fetch_grid(&self, rack_id: RackId) -> Result<GridSnapshot, ClientError> {
        self.get_json(&format!("/cages/rack/{}", rack_id)).await
    }

    async fn assign(
        &self,
        cage_id: CageId,
        professor_id: ProfessorId,
        expected_version: i64,
    ) -> Result<Cage, ClientError> {
        let body = AssignRequest {
            professor_id,
            version: expected_version,
        };
        self.cage_action(&format!("/cages/{}/assign", cage_id), &body)
            .await
    }

    async fn release(&self, cage_id: CageId, expected_version: i64) -> Result<Cage, ClientError> {
        let body = ReleaseRequest {
            version: expected_version,
        };
        self.cage_action(&format!("/cages/{}/release", cage_id), &body)
            .await
    }

    async fn list_racks(&self) -> Result<Vec<Rack>, ClientError> {
        let response: RackListResponse = self.get_json("/racks").await?;
        Ok(response.racks)
    }

    async fn list_professors(&self) -> Result<Vec<Professor>, ClientError> {
        let response: ProfessorListResponse = self.get_json("/professors").await?;
        Ok(response.professors)
    }
}

/// Turn a response into `T`, or into a [`ClientError`] carrying the backend's message.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(ClientError::from_status(
            status.as_u16(),
            error_message(status, &bytes),
        ));
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "cage api returned an undecodable body");
        ClientError::transport(format!("Invalid response body: {}", e))
    })
}

/// Pull a human-readable message out of an error body.
///
/// Understands this backend's `{error: {message}}` envelope and the `{detail}` shape.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let from_body = parsed.as_ref().and_then(|value| {
        value
            .pointer("/error/message")
            .or_else(|| value.get("detail"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });

    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_flag_only_for_409() {
        let conflict = ClientError::from_status(409, "stale");
        assert!(conflict.is_conflict);
        assert_eq!(conflict.kind(), ErrorKind::Conflict);

        let validation = ClientError::from_status(400, "bad");
        assert!(!validation.is_conflict);
        assert_eq!(validation.kind(), ErrorKind::Client);

        let missing = ClientError::from_status(404, "gone");
        assert_eq!(missing.kind(), ErrorKind::Client);

        let server = ClientError::from_status(503, "down");
        assert!(!server.is_conflict);
        assert_eq!(server.kind(), ErrorKind::Transient);

        let transport = ClientError::transport("connection refused");
        assert_eq!(transport.status_code, 500);
        assert!(!transport.is_conflict);
        assert_eq!(transport.kind(), ErrorKind::Transient);
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = br#"{"success":false,"error":{"code":"VERSION_MISMATCH","message":"Version mismatch"}}"#;
        assert_eq!(
            error_message(StatusCode::CONFLICT, body),
            "Version mismatch"
        );
    }

    #[test]
    fn test_error_message_from_detail() {
        let body = br#"{"detail":"Cage not found"}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, body), "Cage not found");
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>oops</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_urls() {
        let client = HttpCageClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/racks"), "http://localhost:8000/api/racks");

        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(
            client.report_url(start, end),
            "http://localhost:8000/api/reports/download?start_date=2026-01-01&end_date=2026-01-31"
        );
    }
}
