//! Credential resolution
//!
//! Cloudflare credentials come from flags, a named or default profile, or
//! the environment, in that order. The Deno Deploy token has its own chain.

use tracing::debug;

use crate::error::{EdgeError, EdgeResult};

use super::types::{Config, ScriptConfig};

pub const CF_ACCOUNT_ID_ENV: &str = "CF_ACCOUNT_ID";
pub const CF_API_TOKEN_ENV: &str = "CF_API_TOKEN";
pub const DENO_DEPLOY_TOKEN_ENV: &str = "DENO_DEPLOY_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: String,
    pub api_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Command line flags that take part in credential resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialOverrides<'a> {
    pub account_id: Option<&'a str>,
    pub api_token: Option<&'a str>,
    pub profile: Option<&'a str>,
}

/// Resolve Cloudflare account id and api token
pub fn resolve_profile(
    config: &Config,
    overrides: CredentialOverrides<'_>,
    script: Option<&ScriptConfig>,
    env: &dyn Fn(&str) -> Option<String>,
) -> EdgeResult<Credentials> {
    if let (Some(account_id), Some(api_token)) = (overrides.account_id, overrides.api_token) {
        debug!("using credentials from flags");
        return Ok(Credentials {
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        });
    }

    let named = overrides
        .profile
        .or_else(|| script.and_then(|s| s.profile.as_deref()));
    if let Some(name) = named {
        let profile = config.profiles.get(name).ok_or_else(|| {
            EdgeError::MissingCredentials(format!("profile '{name}' not found in config"))
        })?;
        debug!(profile = name, "using named profile");
        return Ok(Credentials {
            account_id: profile.account_id.clone(),
            api_token: profile.api_token.clone(),
        });
    }

    if let Some((name, profile)) = config.default_profile() {
        debug!(profile = name, "using default profile");
        return Ok(Credentials {
            account_id: profile.account_id.clone(),
            api_token: profile.api_token.clone(),
        });
    }

    match (env(CF_ACCOUNT_ID_ENV), env(CF_API_TOKEN_ENV)) {
        (Some(account_id), Some(api_token)) => Ok(Credentials {
            account_id,
            api_token,
        }),
        _ => Err(EdgeError::MissingCredentials(format!(
            "pass --account-id and --api-token, define a profile in the config, or set {CF_ACCOUNT_ID_ENV} and {CF_API_TOKEN_ENV}"
        ))),
    }
}

/// Resolve the Deno Deploy access token
pub fn resolve_deploy_token(
    flag: Option<&str>,
    script: Option<&ScriptConfig>,
    env: &dyn Fn(&str) -> Option<String>,
) -> EdgeResult<String> {
    if let Some(token) = flag {
        return Ok(token.to_string());
    }
    if let Some(token) = script.and_then(|s| s.deploy_options().shift_remove("access-token")) {
        return Ok(token);
    }
    env(DENO_DEPLOY_TOKEN_ENV).ok_or_else(|| {
        EdgeError::MissingCredentials(format!(
            "pass --access-token, set deploy = \"access-token=...\" on the script, or set {DENO_DEPLOY_TOKEN_ENV}"
        ))
    })
}
