use edgepush::WatchEvent;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = ColoredText::dim(format!("[{}]", timestamp)).render(supports_color);

    match event {
        WatchEvent::WatchStarted { root, include } => {
            let mut out = format!(
                "{} {} Watching: {}\n",
                prefix,
                Icon::Watch.colored(supports_color, supports_unicode),
                root
            );
            for path in include {
                out.push_str(&format!(
                    "{} {} Also watching: {}\n",
                    prefix,
                    Icon::Arrow.colored(supports_color, supports_unicode),
                    path
                ));
            }
            out.push_str(&format!("{} Press Ctrl+C to stop\n", prefix));
            out
        }
        WatchEvent::ChangesDetected { paths } => {
            let shown = match paths.as_slice() {
                [single] => single.clone(),
                many => format!("{} files", many.len()),
            };
            format!(
                "{} {} Changed: {}\n",
                prefix,
                Icon::Arrow.colored(supports_color, supports_unicode),
                shown
            )
        }
        WatchEvent::PushFailed { kind, message } => format!(
            "{} {} Push failed ({}): {}\n{} {} watching for changes...\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            kind,
            ColoredText::error(message.as_str()).render(supports_color),
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode)
        ),
        WatchEvent::Shutdown => format!(
            "\n{} {} Watch stopped.\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode)
        ),
    }
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
