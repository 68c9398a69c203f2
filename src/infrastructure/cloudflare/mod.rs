//! Cloudflare v4 API client
//!
//! One blocking client per account. Implements both the Workers port and
//! the D1 port so a command needs a single credential resolution.

mod client;
mod d1;
mod workers;

pub use client::{CloudflareClient, CLOUDFLARE_API_BASE};
