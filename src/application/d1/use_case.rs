//! D1 Use Case

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::application::elapsed_ms;
use crate::domain::entities::{D1Backup, D1Database};
use crate::domain::ports::D1Api;
use crate::domain::value_objects::D1Location;
use crate::error::{EdgeError, EdgeResult};

use super::result::{BackupReport, DownloadReport, RestoreReport};

pub struct D1UseCase<A: D1Api> {
    api: A,
}

impl<A: D1Api> D1UseCase<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn list(&self) -> EdgeResult<Vec<D1Database>> {
        self.api.list_databases()
    }

    pub fn create(
        &self,
        name: &str,
        location: Option<D1Location>,
        experimental_backend: bool,
    ) -> EdgeResult<D1Database> {
        self.api.create_database(name, location, experimental_backend)
    }

    /// Look up a database by name
    pub fn find(&self, name: &str) -> EdgeResult<D1Database> {
        let database = self
            .api
            .list_databases()?
            .into_iter()
            .find(|db| db.name == name)
            .ok_or_else(|| EdgeError::DbNotFound {
                name: name.to_string(),
            })?;
        debug!(database = name, uuid = %database.uuid, "resolved database");
        Ok(database)
    }

    pub fn drop(&self, name: &str) -> EdgeResult<D1Database> {
        let database = self.find(name)?;
        self.api.delete_database(&database.uuid)?;
        Ok(database)
    }

    pub fn query(&self, name: &str, sql: &str, params: &[String]) -> EdgeResult<serde_json::Value> {
        let database = self.find(name)?;
        self.api.query_database(&database.uuid, sql, params)
    }

    pub fn backup(&self, name: &str) -> EdgeResult<BackupReport> {
        let database = self.find(name)?;
        self.take_backup(&database.uuid)
    }

    fn take_backup(&self, uuid: &str) -> EdgeResult<BackupReport> {
        let start = Instant::now();
        let backup = self.api.create_backup(uuid)?;
        Ok(BackupReport {
            backup,
            elapsed_ms: elapsed_ms(start),
        })
    }

    /// Backups sorted by creation time, oldest first
    pub fn list_backups(&self, name: &str) -> EdgeResult<Vec<D1Backup>> {
        let database = self.find(name)?;
        let mut backups = self.api.list_backups(&database.uuid)?;
        for backup in &backups {
            if backup.database_id != database.uuid {
                return Err(EdgeError::BackupDatabaseMismatch {
                    backup: backup.id.clone(),
                    expected: database.uuid.clone(),
                    actual: backup.database_id.clone(),
                });
            }
        }
        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(backups)
    }

    pub fn restore(&self, name: &str, backup_id: &str) -> EdgeResult<RestoreReport> {
        let database = self.find(name)?;
        let start = Instant::now();
        self.api.restore_backup(&database.uuid, backup_id)?;
        Ok(RestoreReport {
            backup_id: backup_id.to_string(),
            elapsed_ms: elapsed_ms(start),
        })
    }

    /// Save a backup as a sqlite file, taking a fresh backup if none is given
    pub fn download(
        &self,
        name: &str,
        file: &Path,
        backup_id: Option<&str>,
    ) -> EdgeResult<DownloadReport> {
        let database = self.find(name)?;
        let (created, backup_id) = match backup_id {
            Some(id) => (None, id.to_string()),
            None => {
                let report = self.take_backup(&database.uuid)?;
                let id = report.backup.id.clone();
                (Some(report), id)
            }
        };

        let start = Instant::now();
        let bytes = self.api.download_backup(&database.uuid, &backup_id)?;
        let elapsed_ms = elapsed_ms(start);

        let path = normalize(&std::path::absolute(file)?);
        write_atomic(&path, &bytes)?;

        Ok(DownloadReport {
            created,
            backup_id,
            size: bytes.len() as u64,
            elapsed_ms,
            path,
        })
    }
}

/// Collapse `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Write via a temp file in the target directory, then rename over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> EdgeResult<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| EdgeError::Io(e.error))?;
    Ok(())
}
