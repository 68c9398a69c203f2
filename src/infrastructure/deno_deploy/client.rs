//! Deno Deploy endpoints

use indexmap::IndexMap;
use reqwest::blocking::multipart::{Form, Part as FormPart};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::{AssetManifest, DeployProject};
use crate::domain::ports::{DeployApi, DeployRequest, LogQuery, MessageCallback};
use crate::error::{EdgeError, EdgeResult};

use super::ndjson::for_each_message;

pub const DENO_DEPLOY_API_BASE: &str = "https://dash.deno.com/api";

pub struct DenoDeployClient {
    http: Client,
    base_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct QueryLogsResponse {
    #[serde(default)]
    logs: Vec<serde_json::Value>,
}

impl DenoDeployClient {
    pub fn new(access_token: impl Into<String>) -> EdgeResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("edgepush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DENO_DEPLOY_API_BASE.to_string(),
            access_token: access_token.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url, "deno deploy request");
        self.http
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    fn send(&self, method: Method, url: &str, request: RequestBuilder) -> EdgeResult<Response> {
        let response = request.send()?;
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

    fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> EdgeResult<T> {
        let text = self.send(method, url, request)?.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn deployment_form(request: &DeployRequest, files: &[Vec<u8>]) -> EdgeResult<Form> {
    let mut form = Form::new().part(
        "request",
        FormPart::text(serde_json::to_string(request)?).mime_str("application/json")?,
    );
    for bytes in files {
        form = form.part(
            "file",
            FormPart::bytes(bytes.clone()).mime_str("application/octet-stream")?,
        );
    }
    Ok(form)
}

impl DeployApi for DenoDeployClient {
    fn list_projects(&self) -> EdgeResult<Vec<DeployProject>> {
        let url = self.url("projects");
        self.send_json(Method::GET, &url, self.request(Method::GET, &url))
    }

    fn set_environment_variables(
        &self,
        project_id: &str,
        variables: &IndexMap<String, String>,
    ) -> EdgeResult<()> {
        let url = self.url(&format!("projects/{project_id}/env"));
        let request = self.request(Method::POST, &url).json(variables);
        self.send(Method::POST, &url, request)?;
        Ok(())
    }

    fn negotiate_assets(
        &self,
        project_id: &str,
        manifest: &AssetManifest,
    ) -> EdgeResult<Vec<String>> {
        let url = self.url(&format!("projects/{project_id}/assets/negotiate"));
        let request = self.request(Method::POST, &url).json(manifest);
        self.send_json(Method::POST, &url, request)
    }

    fn deploy(
        &self,
        project_id: &str,
        request: &DeployRequest,
        files: &[Vec<u8>],
        on_message: &mut MessageCallback<'_>,
    ) -> EdgeResult<()> {
        let url = self.url(&format!("projects/{project_id}/deployment_with_assets"));
        let builder = self
            .request(Method::POST, &url)
            .header("accept", "application/x-ndjson")
            .multipart(deployment_form(request, files)?);
        let response = self.send(Method::POST, &url, builder)?;
        for_each_message(response, on_message)
    }

    fn get_logs(
        &self,
        project_id: &str,
        deployment_id: &str,
        on_log: &mut MessageCallback<'_>,
    ) -> EdgeResult<()> {
        let url = self.url(&format!(
            "projects/{project_id}/deployments/{deployment_id}/logs/"
        ));
        let builder = self
            .request(Method::GET, &url)
            .header("accept", "application/x-ndjson");
        let response = self.send(Method::GET, &url, builder)?;
        for_each_message(response, on_log)
    }

    fn query_logs(
        &self,
        project_id: &str,
        deployment_id: &str,
        query: &LogQuery,
    ) -> EdgeResult<Vec<serde_json::Value>> {
        let url = self.url(&format!(
            "projects/{project_id}/deployments/{deployment_id}/query_logs"
        ));
        let builder = self
            .request(Method::GET, &url)
            .query(&[("params", serde_json::to_string(query)?)]);
        let response: QueryLogsResponse = self.send_json(Method::GET, &url, builder)?;
        Ok(response.logs)
    }
}
