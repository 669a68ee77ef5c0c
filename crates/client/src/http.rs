//! The authenticated request wrapper.
//!
//! Every call against the hotel-operations API (other than login) goes
//! through [`ApiClient`]: it refuses to send with a token already known
//! stale, attaches the bearer header, and reacts to server-classified
//! session failures exactly once, centrally. Call sites only ever catch
//! and display the error they are handed.

use std::sync::Arc;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use concierge_core::token;

use crate::classify::{self, MSG_SESSION_EXPIRED};
use crate::error::{ClientError, ClientResult};
use crate::session::manager::SessionManager;

/// Authenticated access to the hotel-operations API.
#[derive(Clone)]
pub struct ApiClient {
    manager: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    pub async fn get(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Value> {
        self.request(Method::DELETE, path, None).await
    }

    /// Send an authenticated request with no extra headers.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        self.request_with_headers(method, path, HeaderMap::new(), body)
            .await
    }

    /// Send an authenticated request, merging `headers` in.
    ///
    /// The bearer header is attached after the caller's headers and cannot
    /// be overridden by them.
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        // Never put a request on the wire with a token already known stale.
        let generation = self.manager.generation();
        let token = match self.manager.current_token() {
            Some(token) if token::is_valid(&token) => token,
            _ => {
                tracing::warn!("refusing to send with a missing or stale token");
                self.manager.handle_token_expiration_for(generation);
                return Err(ClientError::AuthExpired(MSG_SESSION_EXPIRED.to_string()));
            }
        };

        let url = format!("{}{}", self.manager.config().api_url, path);
        let mut request = self
            .manager
            .http()
            .request(method, url)
            .headers(headers)
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        match status {
            StatusCode::UNAUTHORIZED => {
                let classification = classify::classify(&body);
                if classification.is_token_error {
                    tracing::warn!(
                        message = %classification.message,
                        "server classified the session as invalid"
                    );
                    self.manager.handle_token_expiration_for(generation);
                    if classification.is_token_expired {
                        Err(ClientError::AuthExpired(classification.message))
                    } else {
                        Err(ClientError::AuthFailed(classification.message))
                    }
                } else {
                    Err(ClientError::Api {
                        status: status.as_u16(),
                        message: classification.message,
                    })
                }
            }
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body, status.as_u16()),
            }),
        }
    }
}

/// Best-available message from a failure body: `error` over `message`,
/// falling back to the bare status.
fn error_message(body: &Value, status: u16) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
