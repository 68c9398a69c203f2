//! Progress lines for `push` and `push-deploy`

use edgepush::domain::ports::PushEvent;
use edgepush::domain::services::SizeReport;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

fn push_id_suffix(push_id: &Option<String>) -> String {
    push_id
        .as_deref()
        .map(|id| format!(" {id}"))
        .unwrap_or_default()
}

fn line(icon: Icon, text: impl AsRef<str>, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} {}\n",
        icon.colored(supports_color, supports_unicode),
        text.as_ref()
    )
}

fn took(elapsed_ms: u64, supports_color: bool) -> String {
    ColoredText::dim(format!("in {elapsed_ms}ms")).render(supports_color)
}

/// Render one push event as a terminal line
pub fn render_push_event(event: &PushEvent, supports_color: bool, supports_unicode: bool) -> String {
    let c = supports_color;
    let u = supports_unicode;

    match event {
        PushEvent::Bundling { script } => {
            line(Icon::Progress, format!("bundling {script} into bundle.js..."), c, u)
        }
        PushEvent::Bundled {
            backend,
            elapsed_ms,
        } => line(
            Icon::Success,
            format!("bundle finished ({backend}) {}", took(*elapsed_ms, c)),
            c,
            u,
        ),
        PushEvent::BindingsComputed { elapsed_ms } => line(
            Icon::Success,
            format!("computed bindings {}", took(*elapsed_ms, c)),
            c,
            u,
        ),
        PushEvent::NamespaceCreated { name } => line(
            Icon::Arrow,
            format!("creating new durable object namespace: {name}"),
            c,
            u,
        ),
        PushEvent::Uploading {
            script,
            is_module,
            usage_model,
            push_id,
            size,
            compressed_size,
        } => {
            let kind = if *is_module { "module" } else { "script" };
            let worker = match usage_model {
                Some(model) => format!("{model} worker"),
                None => "worker".to_string(),
            };
            let sizes = SizeReport {
                size: *size,
                compressed_size: *compressed_size,
            };
            line(
                Icon::Deploy,
                format!(
                    "putting {kind}-based {worker} {}{}... {}",
                    ColoredText::info(script.as_str()).bold().render(c),
                    push_id_suffix(push_id),
                    ColoredText::dim(sizes.to_string()).render(c)
                ),
                c,
                u,
            )
        }
        PushEvent::MigrationScheduled { deleted_classes } => line(
            Icon::Warning,
            ColoredText::warning(format!(
                "migration will delete durable object class(es): {}",
                deleted_classes.join(", ")
            ))
            .render(c),
            c,
            u,
        ),
        PushEvent::Uploaded {
            script,
            push_id,
            elapsed_ms,
        } => line(
            Icon::Success,
            format!(
                "put script {script}{} {}",
                push_id_suffix(push_id),
                took(*elapsed_ms, c)
            ),
            c,
            u,
        ),
        PushEvent::NamespaceUpdating {
            name,
            script,
            class,
        } => line(
            Icon::Arrow,
            format!("updating durable object namespace {name}: script={script}, class={class}"),
            c,
            u,
        ),
        PushEvent::NamespacesUpdated { elapsed_ms } => line(
            Icon::Success,
            format!("updated durable object namespaces {}", took(*elapsed_ms, c)),
            c,
            u,
        ),
        PushEvent::CustomDomainEnsuring { hostname, script } => line(
            Icon::Arrow,
            format!("ensuring {hostname} points to {script}..."),
            c,
            u,
        ),
        PushEvent::CustomDomainsBound { count, elapsed_ms } => {
            let target = if *count == 1 {
                "custom domain".to_string()
            } else {
                format!("{count} custom domains")
            };
            line(
                Icon::Success,
                format!("bound worker to {target} {}", took(*elapsed_ms, c)),
                c,
                u,
            )
        }
        PushEvent::WorkersDevToggled {
            script,
            subdomain,
            enabled,
            elapsed_ms,
        } => line(
            Icon::Success,
            format!(
                "{} {script}.{subdomain}.workers.dev route {}",
                if *enabled { "enabled" } else { "disabled" },
                took(*elapsed_ms, c)
            ),
            c,
            u,
        ),
        PushEvent::DeployPushing { script, push_id } => line(
            Icon::Deploy,
            format!(
                "pushing module-based deploy worker {}{}...",
                ColoredText::info(script.as_str()).bold().render(c),
                push_id_suffix(push_id)
            ),
            c,
            u,
        ),
        PushEvent::EnvironmentUpdating { count } => line(
            Icon::Arrow,
            format!("updating project environment variables ({count})"),
            c,
            u,
        ),
        PushEvent::FilesNegotiated { updated, total } => line(
            Icon::Remote,
            format!("uploading {updated} of {total} files"),
            c,
            u,
        ),
        PushEvent::DeployMessage { message } => {
            let text = message.to_string();
            if message.get("type").and_then(|t| t.as_str()) == Some("error") {
                line(Icon::Error, ColoredText::error(text).render(c), c, u)
            } else {
                format!("  {}\n", ColoredText::dim(text).render(c))
            }
        }
        PushEvent::Deployed { script, elapsed_ms } => line(
            Icon::Success,
            format!("deployed worker to {script} {}", took(*elapsed_ms, c)),
            c,
            u,
        ),
        PushEvent::Log { entry } => format!("{entry}\n"),
    }
}
