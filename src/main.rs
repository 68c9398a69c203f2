//! edgepush CLI - push edge workers and manage D1 databases
//!
//! Usage: edgepush <COMMAND>
//!
//! Commands:
//!   push         Upload a worker script to Cloudflare Workers
//!   push-deploy  Upload a module worker to Deno Deploy
//!   d1           Manage D1 databases

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::CommandContext;
use crate::ui::context::UiContext;

/// Level filter used when `RUST_LOG` is unset
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,edgepush=debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli, ui: UiContext) -> Result<()> {
    let loaded = edgepush::config::load_config(cli.config.as_deref())?;
    let ctx = CommandContext {
        ui,
        config: loaded.config,
    };

    match &cli.command {
        Commands::Push(args) => commands::push::cmd_push(args, &ctx),
        Commands::PushDeploy(args) => commands::push_deploy::cmd_push_deploy(args, &ctx),
        Commands::D1(command) => commands::d1::cmd_d1(command, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ui = UiContext::new(cli.json, cli.verbose, cli.color);

    if let Err(err) = run(&cli, ui) {
        crate::ui::error::print_error(&err, cli.json);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "warn,edgepush=debug");
        assert_eq!(default_filter(3), "trace");
    }
}
