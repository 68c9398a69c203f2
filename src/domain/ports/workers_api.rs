//! Workers API Port
//!
//! Account-scoped operations against the Workers provider. The account id
//! and credentials are held by the implementation.

use serde::Serialize;

use crate::domain::entities::{DurableObjectNamespace, Part, Zone};
use crate::domain::value_objects::{ScriptName, UsageModel};
use crate::error::EdgeResult;

/// Binding descriptor as sent in the script upload metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiBinding {
    PlainText {
        name: String,
        text: String,
    },
    SecretText {
        name: String,
        text: String,
    },
    KvNamespace {
        name: String,
        namespace_id: String,
    },
    DurableObjectNamespace {
        name: String,
        namespace_id: String,
    },
    WasmModule {
        name: String,
        part: String,
    },
    Service {
        name: String,
        service: String,
        environment: String,
    },
    R2Bucket {
        name: String,
        bucket_name: String,
    },
    AnalyticsEngine {
        name: String,
        dataset: String,
    },
    D1 {
        name: String,
        id: String,
    },
    Queue {
        name: String,
        queue_name: String,
    },
    SecretKey {
        name: String,
        format: String,
        algorithm: serde_json::Value,
        usages: Vec<String>,
        key_base64: String,
    },
    Browser {
        name: String,
    },
}

impl ApiBinding {
    pub fn name(&self) -> &str {
        match self {
            ApiBinding::PlainText { name, .. }
            | ApiBinding::SecretText { name, .. }
            | ApiBinding::KvNamespace { name, .. }
            | ApiBinding::DurableObjectNamespace { name, .. }
            | ApiBinding::WasmModule { name, .. }
            | ApiBinding::Service { name, .. }
            | ApiBinding::R2Bucket { name, .. }
            | ApiBinding::AnalyticsEngine { name, .. }
            | ApiBinding::D1 { name, .. }
            | ApiBinding::Queue { name, .. }
            | ApiBinding::SecretKey { name, .. }
            | ApiBinding::Browser { name } => name,
        }
    }
}

/// Durable object class deletions applied together with an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migrations {
    pub tag: String,
    pub deleted_classes: Vec<String>,
}

/// Everything `put_script` sends in one multipart upload
#[derive(Debug, Clone)]
pub struct ScriptUpload {
    pub script_name: ScriptName,
    pub contents: Vec<u8>,
    pub is_module: bool,
    pub bindings: Vec<ApiBinding>,
    pub parts: Vec<Part>,
    pub migrations: Option<Migrations>,
    pub usage_model: Option<UsageModel>,
    pub logpush: Option<bool>,
    pub compatibility_date: Option<String>,
    pub compatibility_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceUpdate {
    pub id: String,
    pub name: String,
    pub script: String,
    pub class: String,
}

/// Binding of a custom hostname to a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkersDomain {
    pub zone_id: String,
    pub hostname: String,
    pub service: String,
    pub environment: String,
}

pub trait WorkersApi {
    fn list_durable_object_namespaces(&self) -> EdgeResult<Vec<DurableObjectNamespace>>;

    fn create_durable_object_namespace(&self, name: &str) -> EdgeResult<DurableObjectNamespace>;

    fn update_durable_object_namespace(
        &self,
        update: &NamespaceUpdate,
    ) -> EdgeResult<DurableObjectNamespace>;

    fn put_script(&self, upload: &ScriptUpload) -> EdgeResult<()>;

    fn list_zones(&self, per_page: u32) -> EdgeResult<Vec<Zone>>;

    /// Idempotent: re-binding the same hostname to the same script is a no-op remotely
    fn put_workers_domain(&self, domain: &WorkersDomain) -> EdgeResult<()>;

    /// Account-wide `<subdomain>.workers.dev`
    fn get_workers_subdomain(&self) -> EdgeResult<String>;

    fn get_service_subdomain_enabled(&self, script: &str) -> EdgeResult<bool>;

    fn set_service_subdomain_enabled(&self, script: &str, enabled: bool) -> EdgeResult<()>;
}

impl<T: WorkersApi + ?Sized> WorkersApi for &T {
    fn list_durable_object_namespaces(&self) -> EdgeResult<Vec<DurableObjectNamespace>> {
        (**self).list_durable_object_namespaces()
    }

    fn create_durable_object_namespace(&self, name: &str) -> EdgeResult<DurableObjectNamespace> {
        (**self).create_durable_object_namespace(name)
    }

    fn update_durable_object_namespace(
        &self,
        update: &NamespaceUpdate,
    ) -> EdgeResult<DurableObjectNamespace> {
        (**self).update_durable_object_namespace(update)
    }

    fn put_script(&self, upload: &ScriptUpload) -> EdgeResult<()> {
        (**self).put_script(upload)
    }

    fn list_zones(&self, per_page: u32) -> EdgeResult<Vec<Zone>> {
        (**self).list_zones(per_page)
    }

    fn put_workers_domain(&self, domain: &WorkersDomain) -> EdgeResult<()> {
        (**self).put_workers_domain(domain)
    }

    fn get_workers_subdomain(&self) -> EdgeResult<String> {
        (**self).get_workers_subdomain()
    }

    fn get_service_subdomain_enabled(&self, script: &str) -> EdgeResult<bool> {
        (**self).get_service_subdomain_enabled(script)
    }

    fn set_service_subdomain_enabled(&self, script: &str, enabled: bool) -> EdgeResult<()> {
        (**self).set_service_subdomain_enabled(script, enabled)
    }
}
