//! D1 primary location hints

use serde::{Deserialize, Serialize};

/// Hint for where a new D1 database should live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum D1Location {
    /// Western Europe
    Weur,
    /// Eastern Europe
    Eeur,
    /// Asia Pacific
    Apac,
    /// Western North America
    Wnam,
    /// Eastern North America
    Enam,
}

impl D1Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            D1Location::Weur => "weur",
            D1Location::Eeur => "eeur",
            D1Location::Apac => "apac",
            D1Location::Wnam => "wnam",
            D1Location::Enam => "enam",
        }
    }
}

impl std::fmt::Display for D1Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&D1Location::Wnam).unwrap(), "\"wnam\"");
    }
}
