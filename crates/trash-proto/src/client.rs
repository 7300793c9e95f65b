//! REST client for the server-side trash extension.
//!
//! `call` is the single transport primitive: it joins the request URL, maps
//! transport failures and non-2xx statuses to [`ApiError`], and tolerates
//! non-JSON bodies. The typed helpers decode on top of it.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::protocol::{
    DeleteResponse, EmptyResponse, Endpoint, RestoreResponse, StatusResponse, TrashListing,
    TrashPathRequest,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Response { status: u16, message: String },
    /// A 2xx body that does not have the shape the caller asked for.
    #[error("unexpected response body: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

impl ApiError {
    /// The server-provided message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Response { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrashClient {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
}

impl TrashClient {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            namespace: config.namespace.clone(),
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        join_url(&[&self.base_url, &self.namespace, endpoint.path()])
    }

    /// Issue one request and return the body as JSON.
    ///
    /// A body that is not valid JSON is passed through as a JSON string.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint_url(endpoint);
        debug!("{} {}", endpoint.method(), url);

        let mut request = self.http.request(endpoint.method(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;

        let data = if text.is_empty() {
            Value::String(text)
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(v) => v,
                Err(_) => {
                    debug!("{}: not a JSON response body (status {})", url, status);
                    Value::String(text)
                }
            }
        };

        if !status.is_success() {
            return Err(ApiError::Response {
                status: status.as_u16(),
                message: error_message(&data),
            });
        }

        Ok(data)
    }

    async fn call_typed<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let data = self.call(endpoint, body).await?;
        serde_json::from_value(data).map_err(ApiError::InvalidBody)
    }

    pub async fn status(&self) -> Result<StatusResponse, ApiError> {
        self.call_typed(Endpoint::Status, None::<&()>).await
    }

    /// Whether the server has trash support switched on.
    ///
    /// Fails open: any failure reports `true` so older servers without the
    /// `status` endpoint keep showing the panel.
    pub async fn probe_trash_enabled(&self) -> bool {
        match self.status().await {
            Ok(status) => status.trash_enabled,
            Err(e) => {
                warn!("failed to check trash status: {}", e);
                true
            }
        }
    }

    pub async fn list(&self) -> Result<TrashListing, ApiError> {
        self.call_typed(Endpoint::List, None::<&()>).await
    }

    pub async fn restore(&self, trash_path: &str) -> Result<RestoreResponse, ApiError> {
        let body = TrashPathRequest {
            trash_path: trash_path.to_string(),
        };
        self.call_typed(Endpoint::Restore, Some(&body)).await
    }

    pub async fn delete(&self, trash_path: &str) -> Result<DeleteResponse, ApiError> {
        let body = TrashPathRequest {
            trash_path: trash_path.to_string(),
        };
        self.call_typed(Endpoint::Delete, Some(&body)).await
    }

    pub async fn empty(&self) -> Result<EmptyResponse, ApiError> {
        self.call_typed(Endpoint::Empty, None::<&()>).await
    }
}

/// Join URL parts with exactly one slash between them.
pub fn join_url(parts: &[&str]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        let part = if i == 0 {
            part.trim_end_matches('/')
        } else {
            part.trim_matches('/')
        };
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(part);
    }
    out
}

fn error_message(data: &Value) -> String {
    match data {
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => data.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_url_collapses_slashes() {
        assert_eq!(
            join_url(&["http://host:8888/", "/ns/", "list"]),
            "http://host:8888/ns/list"
        );
        assert_eq!(
            join_url(&["http://host:8888/lab", "ns", "status"]),
            "http://host:8888/lab/ns/status"
        );
        assert_eq!(join_url(&["http://host/", "ns", ""]), "http://host/ns");
    }

    #[test]
    fn test_endpoint_url_uses_namespace() {
        let client = TrashClient::new(&ServerConfig::default()).unwrap();
        assert_eq!(
            client.endpoint_url(Endpoint::Restore),
            "http://127.0.0.1:8888/jupyterlab-trash-mgmt-extension/restore"
        );
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            error_message(&json!({"message": "Item not found"})),
            "Item not found"
        );
        assert_eq!(error_message(&json!("plain failure")), "plain failure");
        assert_eq!(error_message(&json!({"error": 1})), r#"{"error":1}"#);
    }

    #[test]
    fn test_server_message_only_for_responses() {
        let e = ApiError::Response {
            status: 404,
            message: "Item not found".into(),
        };
        assert_eq!(e.server_message(), Some("Item not found"));
        assert_eq!(e.to_string(), "Item not found");

        let blank = ApiError::Response {
            status: 500,
            message: "  ".into(),
        };
        assert_eq!(blank.server_message(), None);
    }
}
