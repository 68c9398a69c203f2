//! Command handlers for the edgepush binary

pub mod d1;
pub mod push;
pub mod push_deploy;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use edgepush::config::{resolve_profile, CredentialOverrides, ScriptConfig};
use edgepush::domain::entities::{Binding, BindingKind};
use edgepush::domain::ports::{PushEvent, PushEventSink};
use edgepush::infrastructure::{
    BundleBackend, CloudflareClient, DenoDeployClient, JsonEventSink, CLOUDFLARE_API_BASE,
    DENO_DEPLOY_API_BASE,
};
use edgepush::{Config, EdgeResult, WatchEvent};
use indexmap::IndexMap;

use crate::cli::{BindingArgs, CredentialArgs};
use crate::ui::context::UiContext;
use crate::ui::views;

/// Overrides the Cloudflare api base url (used by tests)
pub const CLOUDFLARE_API_BASE_ENV: &str = "EDGEPUSH_CLOUDFLARE_API_BASE";
/// Overrides the Deno Deploy api base url (used by tests)
pub const DENO_DEPLOY_API_BASE_ENV: &str = "EDGEPUSH_DENO_DEPLOY_API_BASE";

/// State shared by every command
pub struct CommandContext {
    pub ui: UiContext,
    pub config: Config,
}

pub(crate) fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl CredentialArgs {
    pub fn overrides(&self) -> CredentialOverrides<'_> {
        CredentialOverrides {
            account_id: self.account_id.as_deref(),
            api_token: self.api_token.as_deref(),
            profile: self.profile.as_deref(),
        }
    }
}

impl BindingArgs {
    /// Every flag as `(kind, raw argument)`, in flag order
    fn flags(&self) -> impl Iterator<Item = (BindingKind, &str)> {
        let groups: [(BindingKind, &Vec<String>); 12] = [
            (BindingKind::Text, &self.text),
            (BindingKind::Secret, &self.secret),
            (BindingKind::KvNamespace, &self.kv_namespace),
            (BindingKind::DoNamespace, &self.do_namespace),
            (BindingKind::WasmModule, &self.wasm_module),
            (BindingKind::Service, &self.service),
            (BindingKind::R2Bucket, &self.r2_bucket),
            (BindingKind::AnalyticsEngine, &self.ae_dataset),
            (BindingKind::D1Database, &self.d1_database),
            (BindingKind::Queue, &self.queue),
            (BindingKind::SecretKey, &self.secret_key),
            (BindingKind::Browser, &self.browser),
        ];
        groups
            .into_iter()
            .flat_map(|(kind, args)| args.iter().map(move |arg| (kind, arg.as_str())))
    }
}

/// Config bindings first, then command line bindings
///
/// A command line binding replaces the config binding of the same name in
/// place; new names are appended.
pub fn merge_bindings(
    script: Option<&ScriptConfig>,
    args: &BindingArgs,
) -> EdgeResult<IndexMap<String, Binding>> {
    let mut bindings = match script {
        Some(script) => script.bindings()?,
        None => IndexMap::new(),
    };
    for (kind, arg) in args.flags() {
        let (name, binding) = Binding::from_flag(kind, arg)?;
        bindings.insert(name, binding);
    }
    Ok(bindings)
}

pub fn bundle_backend(option: Option<&str>) -> EdgeResult<BundleBackend> {
    option
        .map(BundleBackend::from_option)
        .transpose()
        .map(Option::unwrap_or_default)
}

pub fn cloudflare_client(
    config: &Config,
    credentials: &CredentialArgs,
    script: Option<&ScriptConfig>,
) -> Result<CloudflareClient> {
    let credentials = resolve_profile(config, credentials.overrides(), script, &env_var)?;
    let base_url =
        env_var(CLOUDFLARE_API_BASE_ENV).unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string());
    let client = CloudflareClient::new(credentials.account_id, credentials.api_token)
        .context("failed to build the Cloudflare client")?;
    Ok(client.with_base_url(base_url))
}

pub fn deno_deploy_client(access_token: String) -> Result<DenoDeployClient> {
    let base_url =
        env_var(DENO_DEPLOY_API_BASE_ENV).unwrap_or_else(|| DENO_DEPLOY_API_BASE.to_string());
    let client =
        DenoDeployClient::new(access_token).context("failed to build the Deno Deploy client")?;
    Ok(client.with_base_url(base_url))
}

/// Prints push events as terminal lines
pub struct ConsoleEventSink {
    ui: UiContext,
}

impl ConsoleEventSink {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

impl PushEventSink for ConsoleEventSink {
    fn on_event(&self, event: PushEvent) {
        print!(
            "{}",
            views::push::render_push_event(&event, self.ui.color, self.ui.unicode)
        );
    }
}

/// Terminal or NDJSON sink, depending on `--json`
pub fn event_sink(ui: UiContext, command: &'static str) -> Box<dyn PushEventSink> {
    if ui.json {
        Box::new(JsonEventSink::stdout(command))
    } else {
        Box::new(ConsoleEventSink::new(ui))
    }
}

/// Renders watch events the same way push events are rendered
pub fn watch_event_printer(ui: UiContext, command: &'static str) -> impl Fn(WatchEvent) {
    let json = ui.json.then(|| JsonEventSink::stdout(command));
    move |event| match &json {
        Some(sink) => sink.emit(&event),
        None => print!(
            "{}",
            views::watch::render_watch_event(
                &views::watch::timestamp(),
                &event,
                ui.color,
                ui.unicode
            )
        ),
    }
}

/// Flag cleared by Ctrl+C
pub fn install_ctrlc() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set the Ctrl+C handler")?;
    Ok(running)
}
