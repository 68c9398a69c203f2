//! Domain Layer
//!
//! The core of edgepush - push and D1 logic without direct I/O.
//!
//! ## Structure
//!
//! - `entities/` - Bindings, parts, Deploy file sets, remote records
//! - `value_objects/` - Immutable value types (ScriptName, GitSha1, PushState)
//! - `services/` - Binding resolution, import rewriting, reconcilers
//! - `ports/` - Interface definitions for the remote APIs, bundler and sources
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - remote calls, bundling and reads go through ports
//! 2. **Ordered** - bindings, parts and files keep insertion order
//! 3. **Ports & Adapters** - infrastructure provides the implementations

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
