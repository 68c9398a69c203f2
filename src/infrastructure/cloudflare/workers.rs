//! Workers endpoints

use reqwest::blocking::multipart::{Form, Part as FormPart};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::{DurableObjectNamespace, Zone};
use crate::domain::ports::{
    ApiBinding, Migrations, NamespaceUpdate, ScriptUpload, WorkersApi, WorkersDomain,
};
use crate::error::EdgeResult;

use super::client::CloudflareClient;

/// Part name of the script itself in the upload form
const MODULE_PART: &str = "worker.js";
const SCRIPT_PART: &str = "script";

/// `metadata` part of a script upload
#[derive(Debug, Serialize)]
struct UploadMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    main_module: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_part: Option<&'a str>,
    bindings: &'a [ApiBinding],
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<&'a Migrations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage_model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logpush: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compatibility_date: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    compatibility_flags: &'a [String],
}

impl<'a> UploadMetadata<'a> {
    fn from_upload(upload: &'a ScriptUpload) -> Self {
        let (main_module, body_part) = if upload.is_module {
            (Some(MODULE_PART), None)
        } else {
            (None, Some(SCRIPT_PART))
        };
        Self {
            main_module,
            body_part,
            bindings: &upload.bindings,
            migrations: upload.migrations.as_ref(),
            usage_model: upload.usage_model.map(|m| m.as_str()),
            logpush: upload.logpush,
            compatibility_date: upload.compatibility_date.as_deref(),
            compatibility_flags: &upload.compatibility_flags,
        }
    }
}

fn upload_form(upload: &ScriptUpload) -> EdgeResult<Form> {
    let metadata = serde_json::to_string(&UploadMetadata::from_upload(upload))?;
    let mut form = Form::new().part(
        "metadata",
        FormPart::text(metadata).mime_str("application/json")?,
    );

    let (part_name, content_type) = if upload.is_module {
        (MODULE_PART, "application/javascript+module")
    } else {
        (SCRIPT_PART, "application/javascript")
    };
    form = form.part(
        part_name,
        FormPart::bytes(upload.contents.clone())
            .file_name(part_name)
            .mime_str(content_type)?,
    );

    for part in &upload.parts {
        let mut field = FormPart::bytes(part.bytes.clone())
            .file_name(part.file_name.clone().unwrap_or_else(|| part.name.clone()));
        if let Some(content_type) = &part.content_type {
            field = field.mime_str(content_type)?;
        }
        form = form.part(part.name.clone(), field);
    }
    Ok(form)
}

#[derive(Deserialize)]
struct SubdomainResult {
    subdomain: String,
}

#[derive(Deserialize)]
struct EnabledResult {
    enabled: bool,
}

impl WorkersApi for CloudflareClient {
    fn list_durable_object_namespaces(&self) -> EdgeResult<Vec<DurableObjectNamespace>> {
        let url = self.account_url("workers/durable_objects/namespaces");
        self.send(Method::GET, &url, self.request(Method::GET, &url))
    }

    fn create_durable_object_namespace(&self, name: &str) -> EdgeResult<DurableObjectNamespace> {
        let url = self.account_url("workers/durable_objects/namespaces");
        let request = self
            .request(Method::POST, &url)
            .json(&json!({ "name": name }));
        self.send(Method::POST, &url, request)
    }

    fn update_durable_object_namespace(
        &self,
        update: &NamespaceUpdate,
    ) -> EdgeResult<DurableObjectNamespace> {
        let url = self.account_url(&format!(
            "workers/durable_objects/namespaces/{}",
            update.id
        ));
        let request = self.request(Method::PUT, &url).json(&json!({
            "id": update.id,
            "name": update.name,
            "script": update.script,
            "class": update.class,
        }));
        self.send(Method::PUT, &url, request)
    }

    fn put_script(&self, upload: &ScriptUpload) -> EdgeResult<()> {
        let url = self.account_url(&format!("workers/scripts/{}", upload.script_name));
        let request = self
            .request(Method::PUT, &url)
            .multipart(upload_form(upload)?);
        self.send_unit(Method::PUT, &url, request)
    }

    fn list_zones(&self, per_page: u32) -> EdgeResult<Vec<Zone>> {
        let url = self.url("zones");
        let request = self.request(Method::GET, &url).query(&[
            ("account.id", self.account_id().to_string()),
            ("per_page", per_page.to_string()),
        ]);
        self.send(Method::GET, &url, request)
    }

    fn put_workers_domain(&self, domain: &WorkersDomain) -> EdgeResult<()> {
        let url = self.account_url("workers/domains");
        let request = self.request(Method::PUT, &url).json(domain);
        self.send_unit(Method::PUT, &url, request)
    }

    fn get_workers_subdomain(&self) -> EdgeResult<String> {
        let url = self.account_url("workers/subdomain");
        let result: SubdomainResult = self.send(Method::GET, &url, self.request(Method::GET, &url))?;
        Ok(result.subdomain)
    }

    fn get_service_subdomain_enabled(&self, script: &str) -> EdgeResult<bool> {
        let url = self.account_url(&format!(
            "workers/services/{script}/environments/production/subdomain"
        ));
        let result: EnabledResult = self.send(Method::GET, &url, self.request(Method::GET, &url))?;
        Ok(result.enabled)
    }

    fn set_service_subdomain_enabled(&self, script: &str, enabled: bool) -> EdgeResult<()> {
        let url = self.account_url(&format!(
            "workers/services/{script}/environments/production/subdomain"
        ));
        let request = self
            .request(Method::POST, &url)
            .json(&json!({ "enabled": enabled }));
        self.send_unit(Method::POST, &url, request)
    }
}
