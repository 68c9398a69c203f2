use anyhow::Result;
use edgepush::infrastructure::{CloudflareClient, JsonEventSink};
use edgepush::D1UseCase;
use serde_json::json;

use super::{cloudflare_client, CommandContext};
use crate::cli::{CredentialArgs, D1Command};
use crate::ui::primitives::icon::Icon;
use crate::ui::views::d1 as view;

fn credentials(command: &D1Command) -> &CredentialArgs {
    match command {
        D1Command::List { credentials }
        | D1Command::Drop { credentials, .. }
        | D1Command::Create { credentials, .. }
        | D1Command::Query { credentials, .. }
        | D1Command::Backup { credentials, .. }
        | D1Command::ListBackups { credentials, .. }
        | D1Command::Restore { credentials, .. }
        | D1Command::Download { credentials, .. } => credentials,
    }
}

fn print_pretty(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn cmd_d1(command: &D1Command, ctx: &CommandContext) -> Result<()> {
    let ui = ctx.ui;
    let client: CloudflareClient = cloudflare_client(&ctx.config, credentials(command), None)?;
    let d1 = D1UseCase::new(&client);
    let json = ui.json.then(|| JsonEventSink::stdout("d1"));

    match command {
        D1Command::List { .. } => {
            let databases = d1.list()?;
            match &json {
                Some(sink) => sink.emit(&json!({ "event": "databases", "databases": databases })),
                None => print_pretty(&databases)?,
            }
        }
        D1Command::Drop { name, .. } => {
            let database = d1.drop(name)?;
            match &json {
                Some(sink) => {
                    sink.emit(&json!({ "event": "database_dropped", "database": database }))
                }
                None => println!(
                    "{} Dropped database {} ({})",
                    Icon::Success.colored(ui.color, ui.unicode),
                    database.name,
                    database.uuid
                ),
            }
        }
        D1Command::Create {
            name,
            location,
            experimental_backend,
            ..
        } => {
            let database = d1.create(name, *location, *experimental_backend)?;
            match &json {
                Some(sink) => {
                    sink.emit(&json!({ "event": "database_created", "database": database }))
                }
                None => print_pretty(&database)?,
            }
        }
        D1Command::Query {
            name, sql, param, ..
        } => {
            let result = d1.query(name, sql, param)?;
            match &json {
                Some(sink) => sink.emit(&json!({ "event": "query_result", "result": result })),
                None => print_pretty(&result)?,
            }
        }
        D1Command::Backup { name, .. } => {
            let report = d1.backup(name)?;
            match &json {
                Some(sink) => sink.emit(&json!({
                    "event": "backup_created",
                    "backup": report.backup,
                    "elapsed_ms": report.elapsed_ms,
                })),
                None => print!("{}", view::render_backup_created(&report, ui.color, ui.unicode)),
            }
        }
        D1Command::ListBackups { name, .. } => {
            let backups = d1.list_backups(name)?;
            match &json {
                Some(sink) => sink.emit(&json!({ "event": "backups", "backups": backups })),
                None => print!("{}", view::render_backup_listing(&backups)),
            }
        }
        D1Command::Restore {
            name, backup_id, ..
        } => {
            let report = d1.restore(name, backup_id)?;
            match &json {
                Some(sink) => sink.emit(&json!({
                    "event": "backup_restored",
                    "backup_id": report.backup_id,
                    "elapsed_ms": report.elapsed_ms,
                })),
                None => print!("{}", view::render_restore(&report, ui.color, ui.unicode)),
            }
        }
        D1Command::Download {
            name,
            file,
            backup_id,
            ..
        } => {
            let report = d1.download(name, file, backup_id.as_deref())?;
            match &json {
                Some(sink) => sink.emit(&json!({
                    "event": "backup_downloaded",
                    "backup_id": report.backup_id,
                    "created": report.created.as_ref().map(|c| &c.backup),
                    "size": report.size,
                    "path": report.path,
                    "elapsed_ms": report.elapsed_ms,
                })),
                None => print!("{}", view::render_download(&report, ui.color, ui.unicode)),
            }
        }
    }
    Ok(())
}
