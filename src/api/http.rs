use crate::error::{ClientError, ClientResult};
use crate::session::BearerToken;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Single-shot JSON transport shared by the service wrappers.
///
/// Exactly one request per call: no retries, no timeout beyond the
/// transport's own. The token is fixed at construction.
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
    base_url: String,
    token: Option<BearerToken>,
}

impl ApiHttpClient {
    pub fn new(base_url: &str, token: Option<BearerToken>) -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Network {
                message: format!("failed to initialize HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request_json::<T, JsonValue>(Method::GET, path, None)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    pub async fn request_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let token = self.token.as_ref().ok_or_else(|| {
            warn!(%method, path, "no auth token found, request not sent");
            ClientError::Unauthenticated
        })?;

        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .request(method.clone(), self.endpoint(path))
            .bearer_auth(token.expose())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(payload) = body {
            request = request.json(payload);
        }

        debug!(%method, path, %request_id, "sending request");

        let response = request.send().await.map_err(|e| {
            warn!(%method, path, %request_id, error = %e, "request failed");
            ClientError::Network {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::Network {
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            let body = error_body(status, &text);
            warn!(
                %method,
                path,
                %request_id,
                status = status.as_u16(),
                "backend returned an error"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%method, path, %request_id, status = status.as_u16(), "request succeeded");

        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str::<T>(payload).map_err(|e| ClientError::Decode {
            message: format!("invalid JSON response from {}: {}", path, e),
        })
    }
}

/// The backend's error body as JSON when it is JSON, otherwise as a string;
/// an empty body becomes the status line.
fn error_body(status: reqwest::StatusCode, text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::String(format!("Request failed with status {}", status));
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_body_keeps_json_verbatim() {
        let body = error_body(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"message":"Invalid PIN","code":"PIN_INVALID"}"#,
        );
        assert_eq!(body, json!({ "message": "Invalid PIN", "code": "PIN_INVALID" }));
    }

    #[test]
    fn error_body_falls_back_to_text_and_status() {
        assert_eq!(
            error_body(reqwest::StatusCode::BAD_GATEWAY, "upstream down"),
            json!("upstream down")
        );
        assert_eq!(
            error_body(reqwest::StatusCode::INTERNAL_SERVER_ERROR, ""),
            json!("Request failed with status 500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn missing_token_fails_before_sending() {
        // Nothing listens on this port; a sent request would be a Network error.
        let client = ApiHttpClient::new("http://127.0.0.1:9", None).unwrap();
        let result: ClientResult<JsonValue> = client.get("/wallets").await;
        assert!(matches!(result, Err(ClientError::Unauthenticated)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiHttpClient::new("https://api.thunder.example/", None).unwrap();
        assert_eq!(client.endpoint("/wallets"), "https://api.thunder.example/wallets");
        assert!(!client.has_token());
    }
}
