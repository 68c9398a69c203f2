//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{EdgeError, EdgeResult};

use super::types::{parse_deploy_options, Config};

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".edgepush.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// A config plus where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when no config file was found
    pub path: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> EdgeResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| EdgeError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    for (name, script) in &config.scripts {
        script.bindings()?;
        if let Some(deploy) = &script.deploy {
            parse_deploy_options(deploy).map_err(|entry| EdgeError::Config {
                file: path.to_path_buf(),
                message: format!(
                    "scripts.{name}.deploy: bad option '{entry}', expected key=value"
                ),
            })?;
        }
    }

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Find the config file to use, if any
pub fn locate_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let project = cwd.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }
    let user = dirs::config_dir()?.join("edgepush").join("config.toml");
    user.is_file().then_some(user)
}

/// Load the config found by [`locate_config`], or an empty one
///
/// An explicit `--config` path that cannot be read is an error.
pub fn load_config(explicit: Option<&Path>) -> EdgeResult<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    let Some(path) = locate_config(explicit, &cwd) else {
        return Ok(LoadedConfig::default());
    };
    let (config, warnings) = load_with_warnings(&path)?;
    for warning in &warnings {
        warn!(
            key = %warning.key,
            file = %warning.file.display(),
            suggestion = warning.suggestion.as_deref().unwrap_or(""),
            "unknown config key"
        );
    }
    Ok(LoadedConfig {
        config,
        path: Some(path),
        warnings,
    })
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "profiles",
        "account_id",
        "api_token",
        "default",
        "scripts",
        "path",
        "bindings",
        "value",
        "secret",
        "kv_namespace",
        "do_namespace",
        "wasm_module",
        "service_environment",
        "bucket_name",
        "dataset",
        "d1_database_uuid",
        "queue_name",
        "secret_key",
        "browser",
        "custom_domains",
        "workers_dev",
        "logpush",
        "usage_model",
        "compatibility_date",
        "compatibility_flags",
        "profile",
        "deploy",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
