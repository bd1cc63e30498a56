//! Maintenance mode through the storefront API.
//!
//! # Usage
//!
//! ```bash
//! papalote-cli maintenance status --url http://localhost:3000
//! papalote-cli maintenance on --token "$PAPALOTE_ADMIN_TOKEN"
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Storefront base URL (default `http://localhost:3000`)
//! - `PAPALOTE_ADMIN_TOKEN` - Bearer token accepted by `POST /api/maintenance`

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while talking to the storefront.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// No admin token was given for a change.
    #[error("An admin token is required (--token or PAPALOTE_ADMIN_TOKEN)")]
    MissingToken,

    /// Request could not be sent or the body could not be read.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error envelope.
    #[error("Server rejected the request ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct MaintenanceStatus {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<MaintenanceStatus>,
    #[serde(default)]
    error: Option<String>,
}

/// Thin client for `/api/maintenance`.
pub struct MaintenanceClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl MaintenanceClient {
    #[must_use]
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/maintenance", base_url.trim_end_matches('/')),
            token: token
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
        }
    }

    /// Log the current flag.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceError` if the server cannot be reached or refuses.
    pub async fn status(&self) -> Result<(), MaintenanceError> {
        let response = self.http.get(&self.endpoint).send().await?;
        let status = read(response).await?;
        info!(
            "Maintenance mode is {}",
            if status.enabled { "ON" } else { "OFF" }
        );
        Ok(())
    }

    /// Turn the flag on or off.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceError` if no token was given, the server cannot be
    /// reached, or it rejects the token.
    pub async fn set(&self, enabled: bool) -> Result<(), MaintenanceError> {
        let token = self.token.as_ref().ok_or(MaintenanceError::MissingToken)?;
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token.expose_secret())
            .json(&MaintenanceStatus { enabled })
            .send()
            .await?;
        let status = read(response).await?;
        info!(
            "Maintenance mode turned {}",
            if status.enabled { "ON" } else { "OFF" }
        );
        Ok(())
    }
}

async fn read(response: reqwest::Response) -> Result<MaintenanceStatus, MaintenanceError> {
    let status = response.status();
    let envelope: Envelope = response.json().await?;
    match envelope {
        Envelope {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        Envelope { error, .. } => Err(MaintenanceError::Rejected {
            status,
            message: error.unwrap_or_else(|| "unexpected response".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = MaintenanceClient::new("http://localhost:3000/", None);
        assert_eq!(client.endpoint, "http://localhost:3000/api/maintenance");
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let client = MaintenanceClient::new("http://localhost:3000", Some("  ".to_string()));
        assert!(client.token.is_none());
    }

    #[tokio::test]
    async fn test_set_without_token_fails_before_sending() {
        let client = MaintenanceClient::new("http://127.0.0.1:9", None);
        assert!(matches!(
            client.set(true).await,
            Err(MaintenanceError::MissingToken)
        ));
    }
}
