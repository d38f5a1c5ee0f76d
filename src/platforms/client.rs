use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::{Error, ErrorCode, Result};

/// Shared HTTP client used by every dispatcher
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http_client: Client,
}

impl HttpClient {
    /// Create a new client with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Make a POST request with a JSON body
    ///
    /// # Arguments
    /// * `url` - Full target URL
    /// * `token` - Optional bearer token
    /// * `body` - The request body (will be serialized to JSON)
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .http_client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request
            .json(body)
            .send()
            .await
            .map_err(|e| Error::network(format!("POST request failed: {e}")))
    }

    /// Make a GET request with query parameters
    pub async fn get_query<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        token: Option<&str>,
        query: &Q,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await
            .map_err(|e| Error::network(format!("GET request failed: {e}")))
    }

    /// Fail on any non-2xx status, discarding the body otherwise
    pub async fn expect_success(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.status_error(response).await)
    }

    /// Check if the response is successful and extract the JSON body
    pub async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| Error::malformed(format!("Failed to parse response: {e}")))
        } else {
            Err(self.status_error(response).await)
        }
    }

    async fn status_error(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let code = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ErrorCode::RateLimited
        } else {
            ErrorCode::NetworkError
        };

        Error::new(
            code,
            format!("API request failed with status {status}: {error_text}"),
        )
        .with_http_status(status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_expect_success_accepts_no_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .with_status(204)
            .create_async()
            .await;

        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/hook", server.url());
        let response = client
            .post_json(&url, None, &serde_json::json!({"content": "hi"}))
            .await
            .unwrap();
        assert!(client.expect_success(response).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limited_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(429)
            .with_body(r#"{"retry_after": 1.5}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/hook", server.url());
        let response = client.post_json(&url, None, &serde_json::json!({})).await.unwrap();
        let err = client.expect_success(response).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimited);
        assert_eq!(err.http_status(), Some(429));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/history")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/history", server.url());
        let response = client
            .get_query(&url, Some("t"), &[("limit", "1")])
            .await
            .unwrap();
        let err = client
            .handle_response::<serde_json::Value>(response)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = HttpClient::new(Duration::from_secs(1)).unwrap();
        let err = client
            .post_json("http://127.0.0.1:9/hook", None, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }
}
