//! Deploy Push Options

use indexmap::IndexMap;

use crate::application::push::is_module_specifier;
use crate::domain::entities::Binding;
use crate::domain::value_objects::ScriptName;

/// What a `push-deploy` invocation does after locating the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployMode {
    /// Bundle and deploy
    #[default]
    Push,
    /// Stream live logs of the production deployment
    GetLogs,
    /// Print queried logs of the production deployment
    QueryLogs,
}

/// Options for the Deploy push use case
#[derive(Debug, Clone)]
pub struct PushDeployOptions {
    /// Name of the Deploy project
    pub script_name: ScriptName,
    pub root_specifier: String,
    pub bindings: IndexMap<String, Binding>,
    pub watch: bool,
    pub mode: DeployMode,
}

impl PushDeployOptions {
    pub fn new(script_name: ScriptName, root_specifier: impl Into<String>) -> Self {
        Self {
            script_name,
            root_specifier: root_specifier.into(),
            bindings: IndexMap::new(),
            watch: false,
            mode: DeployMode::Push,
        }
    }

    pub fn with_bindings(mut self, bindings: IndexMap<String, Binding>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_mode(mut self, mode: DeployMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_module(&self) -> bool {
        is_module_specifier(&self.root_specifier)
    }
}
