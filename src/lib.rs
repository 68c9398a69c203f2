//! edgepush - push edge worker scripts from one local project
//!
//! edgepush bundles a worker module, rewrites its local asset imports into
//! upload parts, reconciles the remote resources its bindings reference, and
//! uploads it to Cloudflare Workers or Deno Deploy. It also manages
//! Cloudflare D1 databases and their backups.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod watcher;

// Re-exports for convenience
pub use application::{D1UseCase, PushDeployUseCase, PushUseCase};
pub use config::{Config, Credentials, ScriptRef};
pub use domain::entities::Binding;
pub use error::{EdgeError, EdgeResult};
pub use watcher::{watch, WatchEvent, WatchOptions};
