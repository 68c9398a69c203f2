use anyhow::Result;
use edgepush::application::PushOptions;
use edgepush::config::resolve_script_ref;
use edgepush::domain::value_objects::PushState;
use edgepush::infrastructure::{CommandBundler, DefaultSourceReader};
use edgepush::{PushUseCase, WatchOptions};
use tracing::debug;

use super::{
    bundle_backend, cloudflare_client, event_sink, install_ctrlc, merge_bindings,
    watch_event_printer, CommandContext,
};
use crate::cli::PushArgs;

pub fn cmd_push(args: &PushArgs, ctx: &CommandContext) -> Result<()> {
    let ui = ctx.ui;

    // Name and spec are checked before any credentials or network access
    let script = resolve_script_ref(&args.script_spec, args.name.as_deref(), &ctx.config)?;
    let script_config = script.script_config.as_ref();
    let bindings = merge_bindings(script_config, &args.bindings)?;
    let backend = bundle_backend(args.bundle.as_deref())?;

    let client = cloudflare_client(&ctx.config, &args.credentials, script_config)?;
    debug!(account = client.account_id(), script = %script.script_name, "pushing to workers");

    let custom_domains = if args.custom_domain.is_empty() {
        script_config
            .map(|s| s.custom_domains.clone())
            .unwrap_or_default()
    } else {
        args.custom_domain.clone()
    };
    let workers_dev = args
        .workers_dev
        .or_else(|| script_config.and_then(|s| s.workers_dev));

    let mut options = PushOptions::new(script.script_name.clone(), script.root_specifier.clone())
        .with_bindings(bindings)
        .with_watch(args.watch.watch)
        .with_custom_domains(custom_domains)
        .with_workers_dev(workers_dev)
        .with_delete_classes(args.delete_class.clone());
    options.logpush = args.logpush.or_else(|| script_config.and_then(|s| s.logpush));
    options.usage_model = script_config.and_then(|s| s.usage_model);
    options.compatibility_date = args
        .compatibility_date
        .clone()
        .or_else(|| script_config.and_then(|s| s.compatibility_date.clone()));
    options.compatibility_flags = if args.compatibility_flag.is_empty() {
        script_config
            .map(|s| s.compatibility_flags.clone())
            .unwrap_or_default()
    } else {
        args.compatibility_flag.clone()
    };

    let use_case = PushUseCase::new(
        &client,
        CommandBundler::new(backend),
        DefaultSourceReader::new()?,
    );
    let events = event_sink(ui, "push");
    let mut state = PushState::now();

    if !options.watch {
        let outcome = use_case.push(&options, &mut state, events.as_ref())?;
        if ui.verbose > 0 && !ui.json {
            println!(
                "{} bindings, {} parts{}",
                outcome.bindings.len(),
                outcome.part_names.len(),
                if outcome.part_names.is_empty() {
                    String::new()
                } else {
                    format!(": {}", outcome.part_names.join(", "))
                }
            );
        }
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
        watch_event_printer(ui, "push"),
    )?;
    Ok(())
}
