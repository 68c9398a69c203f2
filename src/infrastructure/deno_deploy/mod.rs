//! Deno Deploy API client

mod client;
mod ndjson;

pub use client::{DenoDeployClient, DENO_DEPLOY_API_BASE};
pub use ndjson::for_each_message;
