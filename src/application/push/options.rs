//! Push Options
//!
//! Everything one `push` invocation needs, after the command line and the
//! config file have been merged.

use indexmap::IndexMap;

use crate::domain::entities::Binding;
use crate::domain::value_objects::{ScriptName, UsageModel};

/// Options for the Workers push use case
#[derive(Debug, Clone)]
pub struct PushOptions {
    pub script_name: ScriptName,
    /// Local path or https url of the root module (or pre-bundled `.js`)
    pub root_specifier: String,
    pub bindings: IndexMap<String, Binding>,
    /// Watch mode; only affects the push id seen by binding macros
    pub watch: bool,
    pub custom_domains: Vec<String>,
    /// `None` leaves the workers.dev route as it is
    pub workers_dev: Option<bool>,
    pub logpush: Option<bool>,
    pub usage_model: Option<UsageModel>,
    pub compatibility_date: Option<String>,
    pub compatibility_flags: Vec<String>,
    /// Durable object classes to delete on the first push
    pub delete_classes: Vec<String>,
}

impl PushOptions {
    pub fn new(script_name: ScriptName, root_specifier: impl Into<String>) -> Self {
        Self {
            script_name,
            root_specifier: root_specifier.into(),
            bindings: IndexMap::new(),
            watch: false,
            custom_domains: Vec::new(),
            workers_dev: None,
            logpush: None,
            usage_model: None,
            compatibility_date: None,
            compatibility_flags: Vec::new(),
            delete_classes: Vec::new(),
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

    pub fn with_custom_domains(mut self, domains: Vec<String>) -> Self {
        self.custom_domains = domains;
        self
    }

    pub fn with_workers_dev(mut self, enabled: Option<bool>) -> Self {
        self.workers_dev = enabled;
        self
    }

    pub fn with_delete_classes(mut self, classes: Vec<String>) -> Self {
        self.delete_classes = classes;
        self
    }

    /// Anything but a pre-bundled `.js` script is a module and gets bundled
    pub fn is_module(&self) -> bool {
        is_module_specifier(&self.root_specifier)
    }
}

pub fn is_module_specifier(root_specifier: &str) -> bool {
    !root_specifier.ends_with(".js")
}
