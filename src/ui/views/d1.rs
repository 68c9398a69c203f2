//! Output of the `d1` subcommands

use std::path::Path;

use edgepush::application::{BackupReport, DownloadReport, RestoreReport};
use edgepush::domain::entities::D1Backup;
use edgepush::domain::value_objects::ByteSize;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Backups sorted by creation time, grouped by day, followed by a total
///
/// `created_at` values are ISO-8601 UTC strings, so the first 10 characters
/// are the day and the first 19 the second-precision timestamp.
pub fn render_backup_listing(backups: &[D1Backup]) -> String {
    let mut out = String::new();
    let mut prev_day: Option<&str> = None;
    for backup in backups {
        let time = backup.created_at.get(..19).unwrap_or(&backup.created_at);
        let day = backup.created_at.get(..10).unwrap_or(&backup.created_at);
        if prev_day.is_some_and(|prev| prev != day) {
            out.push('\n');
        }
        out.push_str(&format!(
            "{} {} state={} tables={} size={}\n",
            backup.id,
            time,
            backup.state,
            backup.num_tables,
            ByteSize(backup.file_size)
        ));
        prev_day = Some(day);
    }
    out.push_str(&format!("{} backups\n", backups.len()));
    out
}

pub fn render_backup_created(
    report: &BackupReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} Backup {} ({}) {}\n",
        Icon::Database.colored(supports_color, supports_unicode),
        report.backup.id,
        ByteSize(report.backup.file_size),
        ColoredText::dim(format!("took {}ms", report.elapsed_ms)).render(supports_color)
    )
}

pub fn render_restore(
    report: &RestoreReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} Restore of backup {} {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        report.backup_id,
        ColoredText::dim(format!("took {}ms", report.elapsed_ms)).render(supports_color)
    )
}

pub fn render_download(
    report: &DownloadReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = String::new();
    if let Some(created) = &report.created {
        out.push_str(&render_backup_created(created, supports_color, supports_unicode));
    }
    out.push_str(&format!(
        "{} Download of backup {} ({}) {}\n",
        Icon::Remote.colored(supports_color, supports_unicode),
        report.backup_id,
        ByteSize(report.size),
        ColoredText::dim(format!("took {}ms", report.elapsed_ms)).render(supports_color)
    ));
    out.push_str(&render_saved_to(&report.path, supports_color, supports_unicode));
    out
}

fn render_saved_to(path: &Path, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} Saved to {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        ColoredText::success(path.display().to_string()).render(supports_color)
    )
}
