//! Binding resolution
//!
//! Turns the user's input bindings into what a target understands:
//! API binding descriptors for Workers, plain environment variables for
//! Deploy. Values are macro-expanded first (`${pushId}`, `${env:NAME}`).

use std::sync::LazyLock;

use base64::Engine;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::domain::entities::{Binding, Part, Parts};
use crate::domain::ports::{ApiBinding, PushEventSink, SourceReader, WorkersApi};
use crate::domain::services::do_namespaces::DurableObjectNamespaces;
use crate::error::{EdgeError, EdgeResult};

static MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("macro pattern is valid"));

/// Expand macros in one binding value
///
/// `${pushId}` becomes the push id, or the empty string outside watch mode.
/// `${env:NAME}` reads the environment through `env`. Anything else inside
/// `${...}` is kept verbatim.
pub fn expand_macros(
    name: &str,
    value: &str,
    push_id: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> EdgeResult<String> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in MACRO.captures_iter(value) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&value[last..whole.start()]);
        let inner = inner.as_str();
        if inner == "pushId" {
            out.push_str(push_id.unwrap_or_default());
        } else if let Some(var) = inner.strip_prefix("env:") {
            let resolved = env(var).ok_or_else(|| EdgeError::BadBinding {
                name: name.to_string(),
                reason: format!("environment variable {var} is not set"),
            })?;
            out.push_str(&resolved);
        } else {
            out.push_str(whole.as_str());
        }
        last = whole.end();
    }
    out.push_str(&value[last..]);
    Ok(out)
}

/// Expand every binding against the process environment
pub fn resolve_bindings(
    input: &IndexMap<String, Binding>,
    push_id: Option<&str>,
) -> EdgeResult<IndexMap<String, Binding>> {
    resolve_bindings_with(input, push_id, &|var| std::env::var(var).ok())
}

pub fn resolve_bindings_with(
    input: &IndexMap<String, Binding>,
    push_id: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> EdgeResult<IndexMap<String, Binding>> {
    input
        .iter()
        .map(|(name, binding)| {
            let expanded = binding
                .clone()
                .try_map_value(|value| expand_macros(name, value, push_id, env))?;
            Ok((name.clone(), expanded))
        })
        .collect()
}

/// `service:environment`, split at the first colon
pub fn parse_service_environment(name: &str, value: &str) -> EdgeResult<(String, String)> {
    value
        .split_once(':')
        .map(|(service, environment)| (service.to_string(), environment.to_string()))
        .ok_or_else(|| EdgeError::BadServiceBinding {
            name: name.to_string(),
            value: value.to_string(),
        })
}

/// Parsed secret key descriptor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretKeyDef {
    pub format: String,
    pub algorithm: serde_json::Value,
    pub usages: Vec<String>,
    pub base64: String,
}

pub fn parse_secret_key(name: &str, descriptor: &str) -> EdgeResult<SecretKeyDef> {
    let bad = |reason: String| EdgeError::BadSecretKey {
        name: name.to_string(),
        reason,
    };
    let def: SecretKeyDef = serde_json::from_str(descriptor).map_err(|e| bad(e.to_string()))?;
    if !def.algorithm.is_object() {
        return Err(bad("algorithm must be an object".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(&def.base64)
        .map_err(|e| bad(format!("base64: {e}")))?;
    Ok(def)
}

/// Context shared by every binding of one Workers push
pub struct WorkersBindingContext<'a, W: WorkersApi, R: SourceReader> {
    pub script_name: &'a str,
    pub namespaces: &'a mut DurableObjectNamespaces<W>,
    pub reader: &'a R,
    pub parts: &'a mut Parts,
    pub events: &'a dyn PushEventSink,
}

/// Map resolved bindings to API descriptors, in input order
pub fn compute_workers_bindings<W: WorkersApi, R: SourceReader>(
    resolved: &IndexMap<String, Binding>,
    ctx: &mut WorkersBindingContext<'_, W, R>,
) -> EdgeResult<Vec<ApiBinding>> {
    resolved
        .iter()
        .map(|(name, binding)| compute_workers_binding(name, binding, ctx))
        .collect()
}

fn compute_workers_binding<W: WorkersApi, R: SourceReader>(
    name: &str,
    binding: &Binding,
    ctx: &mut WorkersBindingContext<'_, W, R>,
) -> EdgeResult<ApiBinding> {
    let name = name.to_string();
    Ok(match binding {
        Binding::Text { value } => ApiBinding::PlainText {
            name,
            text: value.clone(),
        },
        Binding::Secret { secret } => ApiBinding::SecretText {
            name,
            text: secret.clone(),
        },
        Binding::KvNamespace { namespace_id } => ApiBinding::KvNamespace {
            name,
            namespace_id: namespace_id.clone(),
        },
        Binding::DoNamespace { spec } => {
            let namespace_id =
                ctx.namespaces
                    .get_or_create_namespace_id(spec, ctx.script_name, ctx.events)?;
            ApiBinding::DurableObjectNamespace { name, namespace_id }
        }
        Binding::WasmModule { path } => {
            let bytes = ctx.reader.read_bytes(path)?;
            ctx.parts
                .insert(Part::new(name.clone(), bytes).with_content_type("application/wasm"))?;
            ApiBinding::WasmModule {
                part: name.clone(),
                name,
            }
        }
        Binding::Service {
            service_environment,
        } => {
            let (service, environment) = parse_service_environment(&name, service_environment)?;
            ApiBinding::Service {
                name,
                service,
                environment,
            }
        }
        Binding::R2Bucket { bucket_name } => ApiBinding::R2Bucket {
            name,
            bucket_name: bucket_name.clone(),
        },
        Binding::AnalyticsEngine { dataset } => ApiBinding::AnalyticsEngine {
            name,
            dataset: dataset.clone(),
        },
        Binding::D1Database { uuid } => ApiBinding::D1 {
            name,
            id: uuid.clone(),
        },
        Binding::Queue { queue_name } => ApiBinding::Queue {
            name,
            queue_name: queue_name.clone(),
        },
        Binding::SecretKey { descriptor } => {
            let def = parse_secret_key(&name, descriptor)?;
            ApiBinding::SecretKey {
                name,
                format: def.format,
                algorithm: def.algorithm,
                usages: def.usages,
                key_base64: def.base64,
            }
        }
        Binding::Browser => ApiBinding::Browser { name },
    })
}

/// Deploy only understands text and secret bindings, as env vars
pub fn compute_environment_variables(
    resolved: &IndexMap<String, Binding>,
) -> EdgeResult<IndexMap<String, String>> {
    resolved
        .iter()
        .map(|(name, binding)| match binding {
            Binding::Text { value } => Ok((name.clone(), value.clone())),
            Binding::Secret { secret } => Ok((name.clone(), secret.clone())),
            other => Err(EdgeError::BindingUnsupportedOnTarget {
                name: name.clone(),
                kind: other.kind().as_str(),
                target: "deno deploy",
            }),
        })
        .collect()
}
