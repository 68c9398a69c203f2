//! Script reference resolution
//!
//! A script spec is a config key, an https url to a `.ts` module, or a
//! local path. The script name is validated before anything touches the
//! network.

use std::path::Path;

use crate::domain::value_objects::ScriptName;
use crate::error::{EdgeError, EdgeResult};

use super::types::{Config, ScriptConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    pub script_name: ScriptName,
    /// Absolute local path or https url of the root module
    pub root_specifier: String,
    pub script_config: Option<ScriptConfig>,
}

pub fn resolve_script_ref(
    spec: &str,
    name_override: Option<&str>,
    config: &Config,
) -> EdgeResult<ScriptRef> {
    let bad = |reason: &str| EdgeError::BadScriptSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    if let Some(script) = config.script(spec) {
        let script_name = ScriptName::parse(name_override.unwrap_or(spec))?;
        return Ok(ScriptRef {
            script_name,
            root_specifier: normalize_root(&script.path)?,
            script_config: Some(script.clone()),
        });
    }

    if spec.starts_with("https://") {
        let url = url::Url::parse(spec).map_err(|e| bad(&e.to_string()))?;
        if !url.path().ends_with(".ts") {
            return Err(bad("url-based module workers must end in .ts"));
        }
        let basename = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(|file| file.strip_suffix(".ts"))
            .unwrap_or_default();
        let script_name = ScriptName::parse(name_override.unwrap_or(basename))?;
        return Ok(ScriptRef {
            script_name,
            root_specifier: spec.to_string(),
            script_config: None,
        });
    }

    let path = Path::new(spec);
    if path.is_file() {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let script_name = ScriptName::parse(name_override.unwrap_or(stem))?;
        return Ok(ScriptRef {
            script_name,
            root_specifier: normalize_root(spec)?,
            script_config: None,
        });
    }

    Err(bad(
        "not a script in the config, an existing file, or an https url",
    ))
}

/// Local roots become absolute; urls are kept
fn normalize_root(root: &str) -> EdgeResult<String> {
    if root.starts_with("https://") {
        return Ok(root.to_string());
    }
    Ok(std::path::absolute(root)?.to_string_lossy().into_owned())
}
