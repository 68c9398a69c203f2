//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `PushUseCase` - Bundle, bind and upload a Workers script
//! - `PushDeployUseCase` - Bundle and deploy a module to Deno Deploy, or tail its logs
//! - `D1UseCase` - D1 database and backup management

pub mod d1;
pub mod push;
pub mod push_deploy;

#[cfg(test)]
mod test_support;

use std::time::Instant;

pub use d1::{BackupReport, D1UseCase, DownloadReport, RestoreReport};
pub use push::{is_module_specifier, PushOptions, PushOutcome, PushUseCase};
pub use push_deploy::{DeployMode, DeployOutcome, PushDeployOptions, PushDeployUseCase, APP_TS};

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
