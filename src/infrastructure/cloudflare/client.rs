//! Request plumbing shared by the Workers and D1 endpoints

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{EdgeError, EdgeResult};

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Every v4 response is wrapped in this envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

pub struct CloudflareClient {
    http: Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

impl CloudflareClient {
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> EdgeResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("edgepush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            account_id: account_id.into(),
            api_token: api_token.into(),
        })
    }

    /// Point the client at another server (tests use a local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(super) fn account_url(&self, path: &str) -> String {
        self.url(&format!("accounts/{}/{}", self.account_id, path))
    }

    pub(super) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url, "cloudflare request");
        self.http
            .request(method, url)
            .bearer_auth(&self.api_token)
    }

    /// Send and unwrap the `result` of the envelope
    pub(super) fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> EdgeResult<T> {
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        let failed = |body: String| EdgeError::RemoteCallFailed {
            method: method.to_string(),
            url: url.to_string(),
            status: Some(status.as_u16()),
            body,
        };

        let envelope: Envelope = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) => return Err(failed(text)),
        };
        if !status.is_success() || !envelope.success {
            return Err(failed(describe_errors(&envelope.errors, &text)));
        }
        serde_json::from_value(envelope.result).map_err(|e| failed(e.to_string()))
    }

    /// Send and ignore the `result`
    pub(super) fn send_unit(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> EdgeResult<()> {
        self.send::<serde_json::Value>(method, url, request)
            .map(|_| ())
    }

    /// Send and return the raw body (endpoints without an envelope)
    pub(super) fn send_bytes(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> EdgeResult<Vec<u8>> {
        let response = request.send()?;
        let response = check_status(&method, url, response)?;
        Ok(response.bytes()?.to_vec())
    }
}

fn check_status(method: &Method, url: &str, response: Response) -> EdgeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(EdgeError::RemoteCallFailed {
        method: method.to_string(),
        url: url.to_string(),
        status: Some(status.as_u16()),
        body,
    })
}

fn describe_errors(errors: &[ApiMessage], raw: &str) -> String {
    if errors.is_empty() {
        return raw.to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_folded_into_one_line() {
        let errors = vec![
            ApiMessage {
                code: 10021,
                message: "script too large".to_string(),
            },
            ApiMessage {
                code: 10000,
                message: "auth".to_string(),
            },
        ];
        assert_eq!(
            describe_errors(&errors, "{}"),
            "10021: script too large; 10000: auth"
        );
    }

    #[test]
    fn empty_errors_fall_back_to_raw_body() {
        assert_eq!(describe_errors(&[], "raw"), "raw");
    }

    #[test]
    fn urls_are_joined_under_the_account() {
        let client = CloudflareClient::new("acc", "tok")
            .unwrap()
            .with_base_url("http://127.0.0.1:9/");
        assert_eq!(
            client.account_url("d1/database"),
            "http://127.0.0.1:9/accounts/acc/d1/database"
        );
        assert_eq!(client.url("/zones"), "http://127.0.0.1:9/zones");
    }
}
