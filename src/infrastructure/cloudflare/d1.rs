//! D1 endpoints

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{D1Backup, D1Database};
use crate::domain::ports::D1Api;
use crate::domain::value_objects::D1Location;
use crate::error::EdgeResult;

use super::client::CloudflareClient;

#[derive(Debug, Serialize)]
struct CreateDatabaseRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_location_hint: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    experimental: bool,
}

impl D1Api for CloudflareClient {
    fn list_databases(&self) -> EdgeResult<Vec<D1Database>> {
        let url = self.account_url("d1/database");
        let request = self
            .request(Method::GET, &url)
            .query(&[("per_page", "1000")]);
        self.send(Method::GET, &url, request)
    }

    fn create_database(
        &self,
        name: &str,
        location: Option<D1Location>,
        experimental_backend: bool,
    ) -> EdgeResult<D1Database> {
        let url = self.account_url("d1/database");
        let request = self.request(Method::POST, &url).json(&CreateDatabaseRequest {
            name,
            primary_location_hint: location.map(|l| l.as_str()),
            experimental: experimental_backend,
        });
        self.send(Method::POST, &url, request)
    }

    fn delete_database(&self, uuid: &str) -> EdgeResult<()> {
        let url = self.account_url(&format!("d1/database/{uuid}"));
        self.send_unit(Method::DELETE, &url, self.request(Method::DELETE, &url))
    }

    fn query_database(
        &self,
        uuid: &str,
        sql: &str,
        params: &[String],
    ) -> EdgeResult<serde_json::Value> {
        let url = self.account_url(&format!("d1/database/{uuid}/query"));
        let request = self
            .request(Method::POST, &url)
            .json(&json!({ "sql": sql, "params": params }));
        self.send(Method::POST, &url, request)
    }

    fn create_backup(&self, uuid: &str) -> EdgeResult<D1Backup> {
        let url = self.account_url(&format!("d1/database/{uuid}/backup"));
        self.send(Method::POST, &url, self.request(Method::POST, &url))
    }

    fn list_backups(&self, uuid: &str) -> EdgeResult<Vec<D1Backup>> {
        let url = self.account_url(&format!("d1/database/{uuid}/backup"));
        self.send(Method::GET, &url, self.request(Method::GET, &url))
    }

    fn restore_backup(&self, uuid: &str, backup_id: &str) -> EdgeResult<()> {
        let url = self.account_url(&format!("d1/database/{uuid}/backup/{backup_id}/restore"));
        self.send_unit(Method::POST, &url, self.request(Method::POST, &url))
    }

    fn download_backup(&self, uuid: &str, backup_id: &str) -> EdgeResult<Vec<u8>> {
        let url = self.account_url(&format!("d1/database/{uuid}/backup/{backup_id}/download"));
        self.send_bytes(Method::GET, &url, self.request(Method::GET, &url))
    }
}
