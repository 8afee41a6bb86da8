mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Builds a request that expects a JSON response, with an optional JSON body.
pub fn json_request<B: Serialize + ?Sized>(
    method: Method,
    url: Url,
    body: Option<&B>,
) -> Result<Request> {
    let mut req = Request::new(method, url);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(body) = body {
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(serde_json::to_vec(body)?.into());
    }

    Ok(req)
}

/// Executes `req` and decodes a successful response as JSON.
///
/// Non-2xx responses become errors carrying the upstream error message.
pub async fn fetch_json<C, T>(client: &C, req: Request) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let url = req.url().clone();
    let resp = client
        .execute(req)
        .await
        .map_err(|e| anyhow!("Failed to send request to {}: {}", url.path(), e))?;

    let status = resp.status();
    let body = resp.bytes().await?;
    debug!(path = url.path(), %status, bytes = body.len(), "Upstream response received");

    if !status.is_success() {
        return Err(anyhow!(upstream_error_message(status, &body)));
    }

    serde_json::from_slice(&body).map_err(|e| anyhow!("Failed to parse response: {}", e))
}

/// Extracts a human-readable message from an upstream error body.
///
/// PostgREST and Resend both answer with a JSON object carrying `message`
/// (or `error`); anything else falls back to the status and raw body.
pub fn upstream_error_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
    });

    match message {
        Some(message) => message.to_string(),
        None => format!(
            "Upstream returned status {}: {}",
            status,
            String::from_utf8_lossy(body)
        ),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::HttpClient;
    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use reqwest::{Method, Url};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: Method,
        pub url: Url,
        pub headers: HeaderMap,
        pub body: Option<Vec<u8>>,
    }

    impl RecordedRequest {
        pub fn json_body(&self) -> serde_json::Value {
            serde_json::from_slice(self.body.as_deref().unwrap_or_default()).unwrap()
        }
    }

    /// Answers every request with a canned response and remembers what was sent.
    pub struct RecordingClient {
        status: u16,
        body: String,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl RecordingClient {
        pub fn ok(body: &str) -> Self {
            Self::with_status(200, body)
        }

        pub fn with_status(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method: req.method().clone(),
                url: req.url().clone(),
                headers: req.headers().clone(),
                body: req.body().and_then(|b| b.as_bytes()).map(|b| b.to_vec()),
            });

            let resp = axum::http::Response::builder()
                .status(self.status)
                .header("content-type", "application/json")
                .body(self.body.clone())
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingClient;
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: u32,
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_success() {
        let client = RecordingClient::ok(r#"[{"id": 1}, {"id": 2}]"#);
        let req = json_request::<()>(Method::GET, "http://localhost/items".parse().unwrap(), None)
            .unwrap();

        let items: Vec<Item> = fetch_json(&client, req).await.unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(client.requests()[0].headers[ACCEPT], "application/json");
    }

    #[tokio::test]
    async fn test_fetch_json_surfaces_upstream_message() {
        let client = RecordingClient::with_status(401, r#"{"message": "Invalid API key"}"#);
        let req = json_request::<()>(Method::GET, "http://localhost/items".parse().unwrap(), None)
            .unwrap();

        let err = fetch_json::<_, Vec<Item>>(&client, req).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[test]
    fn test_json_request_sets_body_and_content_type() {
        let body = serde_json::json!({ "to": ["a@b.c"] });
        let req = json_request(Method::POST, "http://localhost/emails".parse().unwrap(), Some(&body))
            .unwrap();

        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(serde_json::from_slice::<serde_json::Value>(bytes).unwrap(), body);
    }

    #[test]
    fn test_upstream_error_message_fallbacks() {
        assert_eq!(
            upstream_error_message(StatusCode::BAD_REQUEST, br#"{"error": "bad"}"#),
            "bad"
        );
        assert_eq!(
            upstream_error_message(StatusCode::BAD_GATEWAY, b"gateway down"),
            "Upstream returned status 502 Bad Gateway: gateway down"
        );
        assert_eq!(
            upstream_error_message(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message": ""}"#),
            "Upstream returned status 500 Internal Server Error: {\"message\": \"\"}"
        );
    }
}
