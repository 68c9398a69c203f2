//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod byte_size;
mod d1_location;
mod git_sha1;
mod hash;
mod push_state;
mod script_name;
mod usage_model;

pub use byte_size::ByteSize;
pub use d1_location::D1Location;
pub use git_sha1::GitSha1;
pub use hash::ContentHash;
pub use push_state::PushState;
pub use script_name::ScriptName;
pub use usage_model::UsageModel;
