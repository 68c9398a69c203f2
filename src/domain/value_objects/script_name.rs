//! Script name value object
//!
//! Both remote providers identify a worker by a short lowercase identifier.
//! Validation happens before any network call.

use std::fmt;

use crate::error::{EdgeError, EdgeResult};

/// Validated worker script (or Deploy project) name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptName(String);

impl ScriptName {
    /// Longest name the remote APIs accept
    pub const MAX_LEN: usize = 63;

    /// Parse a name, enforcing `[a-z0-9][a-z0-9_-]*` and the length bound
    pub fn parse(name: &str) -> EdgeResult<Self> {
        if Self::is_valid(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(EdgeError::BadScriptName {
                name: name.to_string(),
                max: Self::MAX_LEN,
            })
        }
    }

    pub fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        name.len() <= Self::MAX_LEN
            && (first.is_ascii_lowercase() || first.is_ascii_digit())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScriptName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
