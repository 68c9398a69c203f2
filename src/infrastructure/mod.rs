//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `cloudflare/` - Workers and D1 endpoints of the Cloudflare v4 API
//! - `deno_deploy/` - Deno Deploy projects, assets, deployments and logs
//! - `bundler` - Subprocess bundler (deno or esbuild)
//! - `source` - Local file / https source reader
//! - `events/` - NDJSON event sink

pub mod bundler;
pub mod cloudflare;
pub mod deno_deploy;
pub mod events;
pub mod source;

// Re-export for convenience
pub use bundler::{BundleBackend, CommandBundler};
pub use cloudflare::{CloudflareClient, CLOUDFLARE_API_BASE};
pub use deno_deploy::{DenoDeployClient, DENO_DEPLOY_API_BASE};
pub use events::JsonEventSink;
pub use source::DefaultSourceReader;
