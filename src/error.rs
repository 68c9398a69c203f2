//! Error types for edgepush
//!
//! Uses `thiserror` for library errors. Every variant names the entity that
//! triggered it (script, binding, hostname, database) so the CLI can print a
//! message the user can act on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for edgepush operations
pub type EdgeResult<T> = Result<T, EdgeError>;

/// Main error type for edgepush operations
#[derive(Error, Debug)]
pub enum EdgeError {
    /// Script name fails the `[a-z0-9][a-z0-9_-]*` identifier policy
    #[error("bad script name '{name}': expected [a-z0-9][a-z0-9_-]* of at most {max} characters")]
    BadScriptName { name: String, max: usize },

    /// Script reference is neither a config key, a local file nor an https module url
    #[error("bad script spec '{spec}': {reason}")]
    BadScriptSpec { spec: String, reason: String },

    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("bundling {root} failed: {message}")]
    BundleFailed { root: String, message: String },

    #[error("unsupported bundle option '{option}', expected backend=deno|esbuild")]
    BadBundleOption { option: String },

    #[error("binding '{name}' ({kind}) is not supported on {target}")]
    BindingUnsupportedOnTarget {
        name: String,
        kind: &'static str,
        target: &'static str,
    },

    #[error("bad service binding '{name}': expected service:environment, found '{value}'")]
    BadServiceBinding { name: String, value: String },

    #[error("bad durable object namespace spec '{spec}': {reason}")]
    BadDoNamespaceSpec { spec: String, reason: String },

    /// Binding table or CLI flag could not be classified
    #[error("bad binding '{name}': {reason}")]
    BadBinding { name: String, reason: String },

    #[error("bad secret key binding '{name}': {reason}")]
    BadSecretKey { name: String, reason: String },

    #[error("unable to locate the parent zone of {hostname}, do you have permissions to edit zones?")]
    ZoneNotFound { hostname: String },

    #[error("unable to locate the parent zone of {hostname}, multiple candidates: {candidates}")]
    ZoneAmbiguous {
        hostname: String,
        candidates: String,
    },

    #[error("zone {zone} (parent of {hostname}) is not usable: {reason}")]
    ZoneNotUsable {
        zone: String,
        hostname: String,
        reason: String,
    },

    #[error("database not found: {name}")]
    DbNotFound { name: String },

    #[error("backup {backup} belongs to database {actual}, expected {expected}")]
    BackupDatabaseMismatch {
        backup: String,
        expected: String,
        actual: String,
    },

    #[error("create a new empty Deno Deploy project named '{name}' at https://dash.deno.com/projects")]
    DeployProjectNotFound { name: String },

    #[error("only module-based workers are supported on Deno Deploy, found {root}")]
    DeployModuleOnly { root: String },

    #[error("no deployment found for project {project}")]
    DeployNoDeployment { project: String },

    /// A binding or rewritten import references a part that was never registered
    #[error("no bytes registered for part '{name}'")]
    PartMissingBytes { name: String },

    #[error("part '{name}' registered twice with different contents")]
    DuplicatePart { name: String },

    #[error("{method} {url} failed{}: {body}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteCallFailed {
        method: String,
        url: String,
        status: Option<u16>,
        body: String,
    },

    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },

    #[error("watch failed: {0}")]
    Watch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EdgeError {
    /// Stable kebab-case name of the error kind (used in NDJSON output)
    pub fn kind(&self) -> &'static str {
        match self {
            EdgeError::BadScriptName { .. } => "bad-script-name",
            EdgeError::BadScriptSpec { .. } => "bad-script-spec",
            EdgeError::MissingCredentials(_) => "missing-credentials",
            EdgeError::BundleFailed { .. } => "bundle-failed",
            EdgeError::BadBundleOption { .. } => "bad-bundle-option",
            EdgeError::BindingUnsupportedOnTarget { .. } => "binding-unsupported-on-target",
            EdgeError::BadServiceBinding { .. } => "bad-service-binding",
            EdgeError::BadDoNamespaceSpec { .. } => "bad-do-namespace-spec",
            EdgeError::BadBinding { .. } => "bad-binding",
            EdgeError::BadSecretKey { .. } => "bad-secret-key",
            EdgeError::ZoneNotFound { .. } => "zone-not-found",
            EdgeError::ZoneAmbiguous { .. } => "zone-ambiguous",
            EdgeError::ZoneNotUsable { .. } => "zone-not-usable",
            EdgeError::DbNotFound { .. } => "db-not-found",
            EdgeError::BackupDatabaseMismatch { .. } => "backup-database-mismatch",
            EdgeError::DeployProjectNotFound { .. } => "deploy-project-not-found",
            EdgeError::DeployModuleOnly { .. } => "deploy-module-only",
            EdgeError::DeployNoDeployment { .. } => "deploy-no-deployment",
            EdgeError::PartMissingBytes { .. } => "part-missing-bytes",
            EdgeError::DuplicatePart { .. } => "duplicate-part",
            EdgeError::RemoteCallFailed { .. } | EdgeError::Http(_) => "remote-call-failed",
            EdgeError::Config { .. } => "config",
            EdgeError::Watch(_) => "watch",
            EdgeError::Io(_) => "io",
            EdgeError::Json(_) => "json",
        }
    }
}
