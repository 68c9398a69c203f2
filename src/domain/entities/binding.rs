//! Binding entity - a name made available to the worker at runtime
//!
//! Bindings arrive from two places: `bindings` tables in the config file and
//! `--*-binding` command line flags. Config tables are read as a
//! `BindingTable` and classified into the tagged `Binding` variant once the
//! file is loaded; a table with zero or several recognized keys is rejected.

use serde::Deserialize;

use crate::error::{EdgeError, EdgeResult};

/// Typed binding value as declared by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Text { value: String },
    Secret { secret: String },
    KvNamespace { namespace_id: String },
    /// `name:Class`
    DoNamespace { spec: String },
    /// Local path to a `.wasm` file
    WasmModule { path: String },
    /// `service:environment`
    Service { service_environment: String },
    R2Bucket { bucket_name: String },
    AnalyticsEngine { dataset: String },
    D1Database { uuid: String },
    Queue { queue_name: String },
    /// JSON descriptor `{ format, algorithm, usages, base64 }`
    SecretKey { descriptor: String },
    Browser,
}

/// Binding kinds, in the order they are listed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Text,
    Secret,
    KvNamespace,
    DoNamespace,
    WasmModule,
    Service,
    R2Bucket,
    AnalyticsEngine,
    D1Database,
    Queue,
    SecretKey,
    Browser,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Text => "text",
            BindingKind::Secret => "secret",
            BindingKind::KvNamespace => "kv-namespace",
            BindingKind::DoNamespace => "do-namespace",
            BindingKind::WasmModule => "wasm-module",
            BindingKind::Service => "service",
            BindingKind::R2Bucket => "r2-bucket",
            BindingKind::AnalyticsEngine => "ae-dataset",
            BindingKind::D1Database => "d1-database",
            BindingKind::Queue => "queue",
            BindingKind::SecretKey => "secret-key",
            BindingKind::Browser => "browser",
        }
    }
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Text { .. } => BindingKind::Text,
            Binding::Secret { .. } => BindingKind::Secret,
            Binding::KvNamespace { .. } => BindingKind::KvNamespace,
            Binding::DoNamespace { .. } => BindingKind::DoNamespace,
            Binding::WasmModule { .. } => BindingKind::WasmModule,
            Binding::Service { .. } => BindingKind::Service,
            Binding::R2Bucket { .. } => BindingKind::R2Bucket,
            Binding::AnalyticsEngine { .. } => BindingKind::AnalyticsEngine,
            Binding::D1Database { .. } => BindingKind::D1Database,
            Binding::Queue { .. } => BindingKind::Queue,
            Binding::SecretKey { .. } => BindingKind::SecretKey,
            Binding::Browser => BindingKind::Browser,
        }
    }

    /// Parse a `--<kind>-binding` argument into `(name, binding)`
    ///
    /// Every kind except `browser` takes `name:value`; only the first colon
    /// splits, so `name:ns:Class` and `name:svc:env` keep their payload intact.
    pub fn from_flag(kind: BindingKind, arg: &str) -> EdgeResult<(String, Binding)> {
        if kind == BindingKind::Browser {
            if arg.is_empty() || arg.contains(':') {
                return Err(EdgeError::BadBinding {
                    name: arg.to_string(),
                    reason: "browser bindings take just a name".to_string(),
                });
            }
            return Ok((arg.to_string(), Binding::Browser));
        }
        let (name, value) = arg
            .split_once(':')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| EdgeError::BadBinding {
                name: arg.to_string(),
                reason: format!("expected --{}-binding name:value", kind),
            })?;
        let value = value.to_string();
        let binding = match kind {
            BindingKind::Text => Binding::Text { value },
            BindingKind::Secret => Binding::Secret { secret: value },
            BindingKind::KvNamespace => Binding::KvNamespace {
                namespace_id: value,
            },
            BindingKind::DoNamespace => Binding::DoNamespace { spec: value },
            BindingKind::WasmModule => Binding::WasmModule { path: value },
            BindingKind::Service => Binding::Service {
                service_environment: value,
            },
            BindingKind::R2Bucket => Binding::R2Bucket { bucket_name: value },
            BindingKind::AnalyticsEngine => Binding::AnalyticsEngine { dataset: value },
            BindingKind::D1Database => Binding::D1Database { uuid: value },
            BindingKind::Queue => Binding::Queue { queue_name: value },
            BindingKind::SecretKey => Binding::SecretKey { descriptor: value },
            BindingKind::Browser => Binding::Browser,
        };
        Ok((name.to_string(), binding))
    }

    /// Apply `f` to the binding's string payload (used for macro expansion)
    pub fn try_map_value(
        self,
        mut f: impl FnMut(&str) -> EdgeResult<String>,
    ) -> EdgeResult<Binding> {
        Ok(match self {
            Binding::Text { value } => Binding::Text { value: f(&value)? },
            Binding::Secret { secret } => Binding::Secret {
                secret: f(&secret)?,
            },
            Binding::KvNamespace { namespace_id } => Binding::KvNamespace {
                namespace_id: f(&namespace_id)?,
            },
            Binding::DoNamespace { spec } => Binding::DoNamespace { spec: f(&spec)? },
            Binding::WasmModule { path } => Binding::WasmModule { path: f(&path)? },
            Binding::Service {
                service_environment,
            } => Binding::Service {
                service_environment: f(&service_environment)?,
            },
            Binding::R2Bucket { bucket_name } => Binding::R2Bucket {
                bucket_name: f(&bucket_name)?,
            },
            Binding::AnalyticsEngine { dataset } => Binding::AnalyticsEngine {
                dataset: f(&dataset)?,
            },
            Binding::D1Database { uuid } => Binding::D1Database { uuid: f(&uuid)? },
            Binding::Queue { queue_name } => Binding::Queue {
                queue_name: f(&queue_name)?,
            },
            Binding::SecretKey { descriptor } => Binding::SecretKey {
                descriptor: f(&descriptor)?,
            },
            Binding::Browser => Binding::Browser,
        })
    }
}

/// Config-file shape of a binding table
///
/// Keys outside the recognized set are left to the config loader, which
/// reports them as warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BindingTable {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub kv_namespace: Option<String>,
    #[serde(default)]
    pub do_namespace: Option<String>,
    #[serde(default)]
    pub wasm_module: Option<String>,
    #[serde(default)]
    pub service_environment: Option<String>,
    #[serde(default)]
    pub bucket_name: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub d1_database_uuid: Option<String>,
    #[serde(default)]
    pub queue_name: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub browser: Option<bool>,
}

impl BindingTable {
    /// The single binding this table declares
    pub fn classify(&self, name: &str) -> EdgeResult<Binding> {
        let mut found = Vec::new();
        if let Some(value) = &self.value {
            found.push(Binding::Text {
                value: value.clone(),
            });
        }
        if let Some(secret) = &self.secret {
            found.push(Binding::Secret {
                secret: secret.clone(),
            });
        }
        if let Some(namespace_id) = &self.kv_namespace {
            found.push(Binding::KvNamespace {
                namespace_id: namespace_id.clone(),
            });
        }
        if let Some(spec) = &self.do_namespace {
            found.push(Binding::DoNamespace { spec: spec.clone() });
        }
        if let Some(path) = &self.wasm_module {
            found.push(Binding::WasmModule { path: path.clone() });
        }
        if let Some(service_environment) = &self.service_environment {
            found.push(Binding::Service {
                service_environment: service_environment.clone(),
            });
        }
        if let Some(bucket_name) = &self.bucket_name {
            found.push(Binding::R2Bucket {
                bucket_name: bucket_name.clone(),
            });
        }
        if let Some(dataset) = &self.dataset {
            found.push(Binding::AnalyticsEngine {
                dataset: dataset.clone(),
            });
        }
        if let Some(uuid) = &self.d1_database_uuid {
            found.push(Binding::D1Database { uuid: uuid.clone() });
        }
        if let Some(queue_name) = &self.queue_name {
            found.push(Binding::Queue {
                queue_name: queue_name.clone(),
            });
        }
        if let Some(descriptor) = &self.secret_key {
            found.push(Binding::SecretKey {
                descriptor: descriptor.clone(),
            });
        }
        if self.browser == Some(true) {
            found.push(Binding::Browser);
        }

        let reason = match found.len() {
            1 => return Ok(found.remove(0)),
            0 => "binding table has no recognized key".to_string(),
            _ => format!(
                "binding table mixes kinds: {}",
                found
                    .iter()
                    .map(|b| b.kind().as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        Err(EdgeError::BadBinding {
            name: name.to_string(),
            reason,
        })
    }
}
