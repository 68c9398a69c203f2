//! Subprocess bundler
//!
//! Runs an external bundler and captures the single-file output from stdout.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ports::{BundleOutput, Bundler};
use crate::error::{EdgeError, EdgeResult};

/// Which external tool produces the bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundleBackend {
    #[default]
    Deno,
    Esbuild,
}

impl BundleBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleBackend::Deno => "deno",
            BundleBackend::Esbuild => "esbuild",
        }
    }

    /// Parse `backend=<name>` bundle options
    pub fn from_option(option: &str) -> EdgeResult<Self> {
        let bad = || EdgeError::BadBundleOption {
            option: option.to_string(),
        };
        let (key, value) = option.split_once('=').ok_or_else(bad)?;
        if key.trim() != "backend" {
            return Err(bad());
        }
        match value.trim() {
            "deno" => Ok(BundleBackend::Deno),
            "esbuild" => Ok(BundleBackend::Esbuild),
            _ => Err(bad()),
        }
    }

    fn command(&self, root: &str) -> Command {
        let mut command = Command::new(self.as_str());
        match self {
            BundleBackend::Deno => {
                command.arg("bundle").arg(root);
            }
            BundleBackend::Esbuild => {
                command.arg(root).arg("--bundle").arg("--format=esm");
            }
        }
        command
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandBundler {
    backend: BundleBackend,
}

impl CommandBundler {
    pub fn new(backend: BundleBackend) -> Self {
        Self { backend }
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, root: &str) -> EdgeResult<BundleOutput> {
        let failed = |message: String| EdgeError::BundleFailed {
            root: root.to_string(),
            message,
        };
        debug!(backend = self.backend.as_str(), root, "bundling");
        let output = self
            .backend
            .command(root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failed(format!("failed to run {}: {e}", self.backend.as_str())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(stderr.trim().to_string()));
        }
        let code = String::from_utf8(output.stdout)
            .map_err(|e| failed(format!("bundle is not utf-8: {e}")))?;
        Ok(BundleOutput {
            code,
            backend: self.backend.as_str().to_string(),
        })
    }
}
