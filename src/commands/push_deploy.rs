use anyhow::Result;
use edgepush::application::{DeployMode, PushDeployOptions};
use edgepush::config::{resolve_deploy_token, resolve_script_ref};
use edgepush::domain::value_objects::PushState;
use edgepush::infrastructure::{CommandBundler, DefaultSourceReader};
use edgepush::{PushDeployUseCase, WatchOptions};

use super::{
    bundle_backend, deno_deploy_client, env_var, event_sink, install_ctrlc, merge_bindings,
    watch_event_printer, CommandContext,
};
use crate::cli::PushDeployArgs;

fn deploy_mode(args: &PushDeployArgs) -> DeployMode {
    if args.get_logs {
        DeployMode::GetLogs
    } else if args.query_logs {
        DeployMode::QueryLogs
    } else {
        DeployMode::Push
    }
}

pub fn cmd_push_deploy(args: &PushDeployArgs, ctx: &CommandContext) -> Result<()> {
    let ui = ctx.ui;

    let script = resolve_script_ref(&args.script_spec, args.name.as_deref(), &ctx.config)?;
    let script_config = script.script_config.as_ref();
    let bindings = merge_bindings(script_config, &args.bindings)?;
    let backend = bundle_backend(args.bundle.as_deref())?;

    let options = PushDeployOptions::new(script.script_name.clone(), script.root_specifier.clone())
        .with_bindings(bindings)
        .with_watch(args.watch.watch)
        .with_mode(deploy_mode(args));

    let access_token =
        resolve_deploy_token(args.access_token.as_deref(), script_config, &env_var)?;
    let client = deno_deploy_client(access_token)?;

    let use_case = PushDeployUseCase::new(
        &client,
        CommandBundler::new(backend),
        DefaultSourceReader::new()?,
    );
    let events = event_sink(ui, "push-deploy");
    let mut state = PushState::now();

    if !options.watch {
        use_case.push(&options, &mut state, events.as_ref())?;
        return Ok(());
    }

    let running = install_ctrlc()?;
    let watch_options =
        WatchOptions::new(script.root_specifier.clone()).with_include(args.watch.watch_include.clone());
    edgepush::watch(
        &watch_options,
        DefaultSourceReader::new()?,
        running,
        || {
            use_case
                .push(&options, &mut state, events.as_ref())
                .map(|_| ())
        },
        watch_event_printer(ui, "push-deploy"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> PushDeployArgs {
        let mut argv = vec!["edgepush", "push-deploy", "worker.ts"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::PushDeploy(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn mode_follows_log_flags() {
        assert_eq!(deploy_mode(&args(&[])), DeployMode::Push);
        assert_eq!(deploy_mode(&args(&["--get-logs"])), DeployMode::GetLogs);
        assert_eq!(deploy_mode(&args(&["--queryLogs"])), DeployMode::QueryLogs);
    }
}
