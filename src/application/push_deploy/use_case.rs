//! Deploy Push Use Case
//!
//! 1. Bundle the root module (module workers only)
//! 2. Resolve text/secret bindings into environment variables
//! 3. Rewrite local asset imports into content-addressed files
//! 4. Locate the project; replace its env vars if the names changed
//! 5. Negotiate the manifest and upload only the missing bodies
//! 6. Forward the deployment event stream

use std::time::Instant;

use tracing::{debug, info};

use crate::application::elapsed_ms;
use crate::domain::entities::{DeployFiles, DeployProject};
use crate::domain::ports::{
    Bundler, DeployApi, DeployRequest, LogQuery, PushEvent, PushEventSink, SourceReader,
};
use crate::domain::services::{
    compute_environment_variables, environment_differs, resolve_bindings, rewrite_for_deploy,
    select_missing,
};
use crate::domain::value_objects::PushState;
use crate::error::{EdgeError, EdgeResult};

use super::options::{DeployMode, PushDeployOptions};

/// Entry module uploaded next to the bundled `worker.ts`
pub const APP_TS: &str = include_str!("app.ts");

/// What one deploy push did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub project_id: String,
    pub uploaded_files: usize,
    pub total_files: usize,
    pub environment_updated: bool,
}

/// Deploy push use case, parameterized by its ports
pub struct PushDeployUseCase<D, B, R>
where
    D: DeployApi,
    B: Bundler,
    R: SourceReader,
{
    api: D,
    bundler: B,
    reader: R,
}

impl<D, B, R> PushDeployUseCase<D, B, R>
where
    D: DeployApi,
    B: Bundler,
    R: SourceReader,
{
    pub fn new(api: D, bundler: B, reader: R) -> Self {
        Self {
            api,
            bundler,
            reader,
        }
    }

    /// Run one push, or the log mode selected in `options`
    ///
    /// Log modes return `None` without touching the push counter.
    pub fn push(
        &self,
        options: &PushDeployOptions,
        state: &mut PushState,
        events: &dyn PushEventSink,
    ) -> EdgeResult<Option<DeployOutcome>> {
        if !options.is_module() {
            return Err(EdgeError::DeployModuleOnly {
                root: options.root_specifier.clone(),
            });
        }
        match options.mode {
            DeployMode::Push => self.deploy(options, state, events).map(Some),
            DeployMode::GetLogs | DeployMode::QueryLogs => {
                self.logs(options, events)?;
                Ok(None)
            }
        }
    }

    fn find_project(&self, name: &str) -> EdgeResult<DeployProject> {
        self.api
            .list_projects()?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| EdgeError::DeployProjectNotFound {
                name: name.to_string(),
            })
    }

    fn logs(&self, options: &PushDeployOptions, events: &dyn PushEventSink) -> EdgeResult<()> {
        let project = self.find_project(options.script_name.as_str())?;
        let deployment_id = project
            .production_deployment_id()
            .ok_or_else(|| EdgeError::DeployNoDeployment {
                project: project.name.clone(),
            })?;
        match options.mode {
            DeployMode::GetLogs => self.api.get_logs(&project.id, deployment_id, &mut |entry| {
                events.on_event(PushEvent::Log { entry });
                Ok(())
            }),
            _ => {
                let logs = self
                    .api
                    .query_logs(&project.id, deployment_id, &LogQuery::default())?;
                for entry in logs {
                    events.on_event(PushEvent::Log { entry });
                }
                Ok(())
            }
        }
    }

    fn deploy(
        &self,
        options: &PushDeployOptions,
        state: &mut PushState,
        events: &dyn PushEventSink,
    ) -> EdgeResult<DeployOutcome> {
        let script_name = options.script_name.as_str();

        events.on_event(PushEvent::Bundling {
            script: script_name.to_string(),
        });
        let start = Instant::now();
        let output = self.bundler.bundle(&options.root_specifier)?;
        events.on_event(PushEvent::Bundled {
            backend: output.backend,
            elapsed_ms: elapsed_ms(start),
        });

        let push_id = state.push_id(options.watch);
        let resolved = resolve_bindings(&options.bindings, push_id.as_deref())?;
        let variables = compute_environment_variables(&resolved)?;

        let mut files = DeployFiles::new();
        let worker_ts = rewrite_for_deploy(
            &output.code,
            &options.root_specifier,
            &self.reader,
            &mut files,
        )?;

        events.on_event(PushEvent::DeployPushing {
            script: script_name.to_string(),
            push_id,
        });
        let start = Instant::now();

        let project = self.find_project(script_name)?;
        let environment_updated = environment_differs(&project.env_vars, &variables);
        if environment_updated {
            info!(project = %project.name, count = variables.len(), "replacing environment variables");
            events.on_event(PushEvent::EnvironmentUpdating {
                count: variables.len(),
            });
            self.api.set_environment_variables(&project.id, &variables)?;
        }

        files.add("app.ts", APP_TS.as_bytes().to_vec());
        files.add("worker.ts", worker_ts.into_bytes());

        let request = DeployRequest::production(files.manifest());
        let missing = match &request.manifest {
            Some(manifest) => self.api.negotiate_assets(&project.id, manifest)?,
            None => Vec::new(),
        };
        let bodies = select_missing(&files, &missing);
        debug!(missing = missing.len(), uploading = bodies.len(), "negotiated assets");
        events.on_event(PushEvent::FilesNegotiated {
            updated: bodies.len(),
            total: files.len(),
        });

        self.api
            .deploy(&project.id, &request, &bodies, &mut |message| {
                let failure = stream_error(&message);
                events.on_event(PushEvent::DeployMessage { message });
                match failure {
                    Some(body) => Err(EdgeError::RemoteCallFailed {
                        method: "POST".to_string(),
                        url: format!("projects/{}/deployment_with_assets", project.id),
                        status: None,
                        body,
                    }),
                    None => Ok(()),
                }
            })?;

        events.on_event(PushEvent::Deployed {
            script: script_name.to_string(),
            elapsed_ms: elapsed_ms(start),
        });
        state.advance();

        Ok(DeployOutcome {
            project_id: project.id,
            uploaded_files: bodies.len(),
            total_files: files.len(),
            environment_updated,
        })
    }
}

/// Error text of a `{"type": "error"}` stream message
fn stream_error(message: &serde_json::Value) -> Option<String> {
    if message.get("type").and_then(|t| t.as_str()) != Some("error") {
        return None;
    }
    Some(
        message
            .get("ctx")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string()),
    )
}
