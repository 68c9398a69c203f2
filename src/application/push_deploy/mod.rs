//! Deno Deploy Push Module
//!
//! ## Structure
//!
//! - `options` - `PushDeployOptions`, `DeployMode`
//! - `use_case` - `PushDeployUseCase`: bundle, reconcile env vars,
//!   negotiate assets, stream the deployment

mod options;
mod use_case;

pub use options::{DeployMode, PushDeployOptions};
pub use use_case::{DeployOutcome, PushDeployUseCase, APP_TS};
