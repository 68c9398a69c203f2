//! D1 Results

use std::path::PathBuf;

use crate::domain::entities::D1Backup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub backup: D1Backup,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub backup_id: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Backup taken because no backup id was given
    pub created: Option<BackupReport>,
    pub backup_id: String,
    pub size: u64,
    pub elapsed_ms: u64,
    /// Absolute path of the written file
    pub path: PathBuf,
}
