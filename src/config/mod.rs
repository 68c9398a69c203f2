//! Configuration module for edgepush
//!
//! Lookup order for the config file:
//! 1. `--config <path>` (highest priority)
//! 2. Project config (`./.edgepush.toml`)
//! 3. User config (`~/.config/edgepush/config.toml`)
//! 4. Empty config (lowest priority)
//!
//! Credentials and script references are resolved against the loaded
//! config, with command line flags and environment variables on top.

mod credentials;
mod loader;
mod script_ref;
mod types;

pub use credentials::{
    resolve_deploy_token, resolve_profile, CredentialOverrides, Credentials,
    DENO_DEPLOY_TOKEN_ENV,
};
pub use loader::{
    load_config, load_with_warnings, locate_config, ConfigWarning, LoadedConfig,
    PROJECT_CONFIG_FILE,
};
pub use script_ref::{resolve_script_ref, ScriptRef};
pub use types::{parse_deploy_options, Config, ProfileConfig, ScriptConfig};
