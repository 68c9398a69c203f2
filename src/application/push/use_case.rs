//! Workers Push Use Case
//!
//! One push, strictly sequential:
//! 1. Bundle the root module (or read the pre-bundled script)
//! 2. Resolve bindings, creating durable object namespaces as needed
//! 3. Rewrite local asset imports into parts
//! 4. Upload script, bindings and parts in a single call
//! 5. Flush queued namespace updates
//! 6. First push only: custom domains and the workers.dev route
//!
//! The push counter in `PushState` advances only after a successful push.

use std::time::Instant;

use tracing::debug;

use crate::domain::entities::Parts;
use crate::domain::ports::{
    ApiBinding, Bundler, PushEvent, PushEventSink, ScriptUpload, SourceReader, WorkersApi,
};
use crate::domain::services::{
    compute_migrations, compute_sizes, compute_workers_bindings, ensure_custom_domain,
    reconcile_workers_dev, resolve_bindings, rewrite_for_workers, DurableObjectNamespaces,
    WorkersBindingContext, ZONES_PER_PAGE,
};
use crate::application::elapsed_ms;
use crate::domain::value_objects::PushState;
use crate::error::EdgeResult;

use super::options::PushOptions;
use super::result::PushOutcome;

/// Workers push use case, parameterized by its ports
pub struct PushUseCase<W, B, R>
where
    W: WorkersApi,
    B: Bundler,
    R: SourceReader,
{
    api: W,
    bundler: B,
    reader: R,
}

impl<W, B, R> PushUseCase<W, B, R>
where
    W: WorkersApi,
    B: Bundler,
    R: SourceReader,
{
    pub fn new(api: W, bundler: B, reader: R) -> Self {
        Self {
            api,
            bundler,
            reader,
        }
    }

    /// Build and upload the script once
    pub fn push(
        &self,
        options: &PushOptions,
        state: &mut PushState,
        events: &dyn PushEventSink,
    ) -> EdgeResult<PushOutcome> {
        let script_name = options.script_name.as_str();
        let is_module = options.is_module();

        let source = if is_module {
            events.on_event(PushEvent::Bundling {
                script: script_name.to_string(),
            });
            let start = Instant::now();
            let output = self.bundler.bundle(&options.root_specifier)?;
            events.on_event(PushEvent::Bundled {
                backend: output.backend,
                elapsed_ms: elapsed_ms(start),
            });
            output.code
        } else {
            self.reader.read_to_string(&options.root_specifier)?
        };

        let start = Instant::now();
        let push_id = state.push_id(options.watch);
        let resolved = resolve_bindings(&options.bindings, push_id.as_deref())?;
        let mut namespaces = DurableObjectNamespaces::new(&self.api);
        let mut parts = Parts::new();
        let bindings = compute_workers_bindings(
            &resolved,
            &mut WorkersBindingContext {
                script_name,
                namespaces: &mut namespaces,
                reader: &self.reader,
                parts: &mut parts,
                events,
            },
        )?;
        events.on_event(PushEvent::BindingsComputed {
            elapsed_ms: elapsed_ms(start),
        });

        let migrations = if state.is_first_push() {
            compute_migrations(&options.delete_classes)
        } else {
            None
        };

        let source = if is_module {
            rewrite_for_workers(&source, &options.root_specifier, &self.reader, &mut parts)?
        } else {
            source
        };
        for binding in &bindings {
            if let ApiBinding::WasmModule { part, .. } = binding {
                parts.require(part)?;
            }
        }

        let contents = source.into_bytes();
        let size = compute_sizes(&contents, &parts)?;
        events.on_event(PushEvent::Uploading {
            script: script_name.to_string(),
            is_module,
            usage_model: options.usage_model.map(|m| m.to_string()),
            push_id: push_id.clone(),
            size: size.size,
            compressed_size: size.compressed_size,
        });
        if let Some(migrations) = &migrations {
            events.on_event(PushEvent::MigrationScheduled {
                deleted_classes: migrations.deleted_classes.clone(),
            });
        }

        let start = Instant::now();
        let part_names: Vec<String> = parts.names().map(str::to_string).collect();
        let upload = ScriptUpload {
            script_name: options.script_name.clone(),
            contents,
            is_module,
            bindings,
            parts: parts.into_vec(),
            migrations,
            usage_model: options.usage_model,
            logpush: options.logpush,
            compatibility_date: options.compatibility_date.clone(),
            compatibility_flags: options.compatibility_flags.clone(),
        };
        self.api.put_script(&upload)?;
        events.on_event(PushEvent::Uploaded {
            script: script_name.to_string(),
            push_id: push_id.clone(),
            elapsed_ms: elapsed_ms(start),
        });

        if namespaces.has_pending_updates() {
            let start = Instant::now();
            namespaces.flush_pending_updates(events)?;
            events.on_event(PushEvent::NamespacesUpdated {
                elapsed_ms: elapsed_ms(start),
            });
        }

        if state.is_first_push() {
            self.first_push_setup(options, events)?;
        }

        let outcome = PushOutcome {
            push_number: state.push_number(),
            push_id,
            bindings: upload.bindings,
            part_names,
            size,
        };
        state.advance();
        Ok(outcome)
    }

    /// Custom domains and the workers.dev route, once per invocation
    fn first_push_setup(&self, options: &PushOptions, events: &dyn PushEventSink) -> EdgeResult<()> {
        let script_name = options.script_name.as_str();

        if !options.custom_domains.is_empty() {
            let start = Instant::now();
            let zones = self.api.list_zones(ZONES_PER_PAGE)?;
            debug!(zones = zones.len(), "listed zones");
            for hostname in &options.custom_domains {
                ensure_custom_domain(&self.api, hostname, &zones, script_name, events)?;
            }
            events.on_event(PushEvent::CustomDomainsBound {
                count: options.custom_domains.len(),
                elapsed_ms: elapsed_ms(start),
            });
        }

        if let Some(enabled) = options.workers_dev {
            let start = Instant::now();
            let outcome = reconcile_workers_dev(&self.api, script_name, enabled)?;
            events.on_event(PushEvent::WorkersDevToggled {
                script: script_name.to_string(),
                subdomain: outcome.subdomain,
                enabled,
                elapsed_ms: elapsed_ms(start),
            });
        }
        Ok(())
    }
}
