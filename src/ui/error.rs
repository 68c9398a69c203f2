use edgepush::EdgeError;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Suggested next step for errors the user can fix locally
fn fix_hint(err: &EdgeError) -> Option<&'static str> {
    match err {
        EdgeError::MissingCredentials(_) => Some(
            "Pass --account-id/--api-token, add a [profiles.<name>] table to .edgepush.toml, \
             or set CF_ACCOUNT_ID and CF_API_TOKEN.",
        ),
        EdgeError::BadScriptSpec { .. } => Some(
            "Use a script name from the config, a local file path, or an https url ending in .ts.",
        ),
        EdgeError::DeployModuleOnly { .. } => {
            Some("Point push-deploy at a .ts module root instead of a .js script.")
        }
        EdgeError::BundleFailed { .. } => {
            Some("Check that deno (or esbuild with --bundle backend=esbuild) is on PATH.")
        }
        EdgeError::ZoneNotFound { .. } => {
            Some("The API token needs Zone:Read on the zone that owns the custom domain.")
        }
        _ => None,
    }
}

pub fn format_edge_error(err: &EdgeError, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        ColoredText::error("ERROR").bold().render(supports_color),
        ColoredText::dim(format!("[{}]", err.kind())).render(supports_color)
    );
    out.push_str(&format!("  {}\n", err));
    if let Some(fix) = fix_hint(err) {
        out.push_str(&format!(
            "  {} {}\n",
            ColoredText::info("FIX:").render(supports_color),
            fix
        ));
    }
    out
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    if let Some(edge) = err.downcast_ref::<EdgeError>() {
        return format_edge_error(edge, supports_color, supports_unicode);
    }

    format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        err
    )
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<EdgeError>()
        .map(EdgeError::kind)
        .unwrap_or("error")
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "error",
            "kind": error_kind(err),
            "message": err.to_string(),
        });
        println!("{}", output);
        return;
    }

    let caps = crate::ui::terminal::detect_capabilities();
    if caps.is_ci && std::env::var("GITHUB_ACTIONS").is_ok() {
        println!("::error title=edgepush::{}", err);
    }

    eprint!(
        "{}",
        format_error(err, caps.supports_color && !caps.is_ci, caps.supports_unicode)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_error_shows_kind_and_message() {
        let err = EdgeError::DbNotFound {
            name: "db1".to_string(),
        };
        let rendered = format_edge_error(&err, false, false);
        assert_eq!(rendered, "[FAIL] ERROR [db-not-found]\n  database not found: db1\n");
    }

    #[test]
    fn fixable_errors_include_hint() {
        let err = EdgeError::DeployModuleOnly {
            root: "dist/worker.js".to_string(),
        };
        let rendered = format_edge_error(&err, false, true);
        assert!(rendered.contains("FIX:"));
        assert!(rendered.contains("dist/worker.js"));
    }

    #[test]
    fn anyhow_wrapped_edge_error_is_recognized() {
        let err = anyhow::Error::new(EdgeError::MissingCredentials("no profile".to_string()));
        assert_eq!(error_kind(&err), "missing-credentials");
        assert!(format_error(&err, false, false).contains("[missing-credentials]"));
    }

    #[test]
    fn other_errors_print_message_only() {
        let err = anyhow::anyhow!("something broke");
        assert_eq!(format_error(&err, false, false), "[FAIL] something broke\n");
        assert_eq!(error_kind(&err), "error");
    }
}
