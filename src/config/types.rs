//! Configuration type definitions

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::domain::entities::{Binding, BindingTable};
use crate::domain::value_objects::UsageModel;
use crate::error::EdgeResult;

static DEPLOY_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z-]+)=(.+?)$").expect("deploy option pattern is valid"));

/// Account credentials under `[profiles.<name>]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileConfig {
    pub account_id: String,
    pub api_token: String,

    /// Used when no profile is named explicitly
    #[serde(default)]
    pub default: bool,
}

/// A named script under `[scripts.<name>]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptConfig {
    /// Local path or https url of the root module
    pub path: String,

    /// Binding tables as written; see [`ScriptConfig::bindings`]
    #[serde(default, rename = "bindings")]
    pub binding_tables: IndexMap<String, BindingTable>,

    #[serde(default)]
    pub custom_domains: Vec<String>,

    #[serde(default)]
    pub workers_dev: Option<bool>,

    #[serde(default)]
    pub logpush: Option<bool>,

    #[serde(default)]
    pub usage_model: Option<UsageModel>,

    #[serde(default)]
    pub compatibility_date: Option<String>,

    #[serde(default)]
    pub compatibility_flags: Vec<String>,

    /// Profile to use for this script
    #[serde(default)]
    pub profile: Option<String>,

    /// Deno Deploy options, `key=value` separated by commas
    #[serde(default)]
    pub deploy: Option<String>,
}

impl ScriptConfig {
    /// Bindings classified from their tables, in file order
    pub fn bindings(&self) -> EdgeResult<IndexMap<String, Binding>> {
        self.binding_tables
            .iter()
            .map(|(name, table)| Ok((name.clone(), table.classify(name)?)))
            .collect()
    }

    /// Parsed `deploy` options; malformed entries were rejected at load time
    pub fn deploy_options(&self) -> IndexMap<String, String> {
        self.deploy
            .as_deref()
            .and_then(|s| parse_deploy_options(s).ok())
            .unwrap_or_default()
    }
}

/// Parse `access-token=abc,other=x`
///
/// Returns the first malformed entry on failure.
pub fn parse_deploy_options(value: &str) -> Result<IndexMap<String, String>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let caps = DEPLOY_OPTION
                .captures(entry)
                .ok_or_else(|| entry.to_string())?;
            Ok((caps[1].to_string(), caps[2].to_string()))
        })
        .collect()
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profiles: IndexMap<String, ProfileConfig>,

    #[serde(default)]
    pub scripts: IndexMap<String, ScriptConfig>,
}

impl Config {
    pub fn script(&self, name: &str) -> Option<&ScriptConfig> {
        self.scripts.get(name)
    }

    /// Profile marked `default`, or the only profile
    pub fn default_profile(&self) -> Option<(&str, &ProfileConfig)> {
        self.profiles
            .iter()
            .find(|(_, p)| p.default)
            .or_else(|| {
                if self.profiles.len() == 1 {
                    self.profiles.iter().next()
                } else {
                    None
                }
            })
            .map(|(name, p)| (name.as_str(), p))
    }
}
