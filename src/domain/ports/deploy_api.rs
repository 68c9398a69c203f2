//! Deploy API Port
//!
//! Operations against the Deno Deploy provider. Streaming endpoints hand
//! each decoded message to a callback as it arrives; a callback error stops
//! the stream.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::entities::{AssetManifest, DeployProject};
use crate::error::EdgeResult;

/// JSON `request` part of a deployment upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub url: String,
    pub import_map_url: Option<String>,
    pub production: bool,
    pub manifest: Option<AssetManifest>,
}

impl DeployRequest {
    /// Production deployment served from the uploaded `app.ts`
    pub fn production(manifest: AssetManifest) -> Self {
        Self {
            url: "file:///src/app.ts".to_string(),
            import_map_url: None,
            production: true,
            manifest: Some(manifest),
        }
    }
}

/// Filters for `query_logs`; empty means the server defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

pub type MessageCallback<'a> = dyn FnMut(serde_json::Value) -> EdgeResult<()> + 'a;

pub trait DeployApi {
    fn list_projects(&self) -> EdgeResult<Vec<DeployProject>>;

    /// Replace all environment variables of a project
    fn set_environment_variables(
        &self,
        project_id: &str,
        variables: &IndexMap<String, String>,
    ) -> EdgeResult<()>;

    /// Returns the git-sha1 hashes the server does not have yet
    fn negotiate_assets(&self, project_id: &str, manifest: &AssetManifest)
        -> EdgeResult<Vec<String>>;

    fn deploy(
        &self,
        project_id: &str,
        request: &DeployRequest,
        files: &[Vec<u8>],
        on_message: &mut MessageCallback<'_>,
    ) -> EdgeResult<()>;

    /// Live log stream of a deployment; returns when the server closes it
    fn get_logs(
        &self,
        project_id: &str,
        deployment_id: &str,
        on_log: &mut MessageCallback<'_>,
    ) -> EdgeResult<()>;

    fn query_logs(
        &self,
        project_id: &str,
        deployment_id: &str,
        query: &LogQuery,
    ) -> EdgeResult<Vec<serde_json::Value>>;
}

impl<T: DeployApi + ?Sized> DeployApi for &T {
    fn list_projects(&self) -> EdgeResult<Vec<DeployProject>> {
        (**self).list_projects()
    }

    fn set_environment_variables(
        &self,
        project_id: &str,
        variables: &IndexMap<String, String>,
    ) -> EdgeResult<()> {
        (**self).set_environment_variables(project_id, variables)
    }

    fn negotiate_assets(
        &self,
        project_id: &str,
        manifest: &AssetManifest,
    ) -> EdgeResult<Vec<String>> {
        (**self).negotiate_assets(project_id, manifest)
    }

    fn deploy(
        &self,
        project_id: &str,
        request: &DeployRequest,
        files: &[Vec<u8>],
        on_message: &mut MessageCallback<'_>,
    ) -> EdgeResult<()> {
        (**self).deploy(project_id, request, files, on_message)
    }

    fn get_logs(
        &self,
        project_id: &str,
        deployment_id: &str,
        on_log: &mut MessageCallback<'_>,
    ) -> EdgeResult<()> {
        (**self).get_logs(project_id, deployment_id, on_log)
    }

    fn query_logs(
        &self,
        project_id: &str,
        deployment_id: &str,
        query: &LogQuery,
    ) -> EdgeResult<Vec<serde_json::Value>> {
        (**self).query_logs(project_id, deployment_id, query)
    }
}
