//! D1 API Port

use crate::domain::entities::{D1Backup, D1Database};
use crate::domain::value_objects::D1Location;
use crate::error::EdgeResult;

pub trait D1Api {
    fn list_databases(&self) -> EdgeResult<Vec<D1Database>>;

    fn create_database(
        &self,
        name: &str,
        location: Option<D1Location>,
        experimental_backend: bool,
    ) -> EdgeResult<D1Database>;

    fn delete_database(&self, uuid: &str) -> EdgeResult<()>;

    /// Run `sql` with ordinal `params`, returning the raw result array
    fn query_database(
        &self,
        uuid: &str,
        sql: &str,
        params: &[String],
    ) -> EdgeResult<serde_json::Value>;

    fn create_backup(&self, uuid: &str) -> EdgeResult<D1Backup>;

    fn list_backups(&self, uuid: &str) -> EdgeResult<Vec<D1Backup>>;

    fn restore_backup(&self, uuid: &str, backup_id: &str) -> EdgeResult<()>;

    /// Raw sqlite bytes of a backup
    fn download_backup(&self, uuid: &str, backup_id: &str) -> EdgeResult<Vec<u8>>;
}

impl<T: D1Api + ?Sized> D1Api for &T {
    fn list_databases(&self) -> EdgeResult<Vec<D1Database>> {
        (**self).list_databases()
    }

    fn create_database(
        &self,
        name: &str,
        location: Option<D1Location>,
        experimental_backend: bool,
    ) -> EdgeResult<D1Database> {
        (**self).create_database(name, location, experimental_backend)
    }

    fn delete_database(&self, uuid: &str) -> EdgeResult<()> {
        (**self).delete_database(uuid)
    }

    fn query_database(
        &self,
        uuid: &str,
        sql: &str,
        params: &[String],
    ) -> EdgeResult<serde_json::Value> {
        (**self).query_database(uuid, sql, params)
    }

    fn create_backup(&self, uuid: &str) -> EdgeResult<D1Backup> {
        (**self).create_backup(uuid)
    }

    fn list_backups(&self, uuid: &str) -> EdgeResult<Vec<D1Backup>> {
        (**self).list_backups(uuid)
    }

    fn restore_backup(&self, uuid: &str, backup_id: &str) -> EdgeResult<()> {
        (**self).restore_backup(uuid, backup_id)
    }

    fn download_backup(&self, uuid: &str, backup_id: &str) -> EdgeResult<Vec<u8>> {
        (**self).download_backup(uuid, backup_id)
    }
}
