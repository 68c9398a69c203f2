//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod bundler;
pub mod d1_api;
pub mod deploy_api;
pub mod push_events;
pub mod source_reader;
pub mod workers_api;

pub use bundler::{BundleOutput, Bundler};
pub use d1_api::D1Api;
pub use deploy_api::{DeployApi, DeployRequest, LogQuery, MessageCallback};
pub use push_events::{NoopEventSink, PushEvent, PushEventSink};
pub use source_reader::SourceReader;
pub use workers_api::{
    ApiBinding, Migrations, NamespaceUpdate, ScriptUpload, WorkersApi, WorkersDomain,
};
