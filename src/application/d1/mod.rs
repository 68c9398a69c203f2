//! D1 Module
//!
//! Database management on top of the `D1Api` port. Every operation except
//! `list` and `create` starts by resolving the database name to its uuid.

mod result;
mod use_case;

pub use result::{BackupReport, DownloadReport, RestoreReport};
pub use use_case::D1UseCase;
