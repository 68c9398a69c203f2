//! Durable object namespace reconciliation
//!
//! One reconciler per push. Namespaces are created eagerly while bindings
//! are computed; script/class updates are queued and only applied once the
//! script upload succeeded, since the remote rejects classes the current
//! script does not export.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::domain::ports::{NamespaceUpdate, PushEvent, PushEventSink, WorkersApi};
use crate::error::{EdgeError, EdgeResult};

static NAMESPACE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("namespace pattern is valid"));

/// Split `name:Class`
pub fn parse_namespace_spec(spec: &str) -> EdgeResult<(&str, &str)> {
    let bad = |reason: &str| EdgeError::BadDoNamespaceSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };
    let tokens: Vec<&str> = spec.split(':').collect();
    let [name, class] = tokens.as_slice() else {
        return Err(bad("expected name:Class"));
    };
    if !NAMESPACE_NAME.is_match(name) {
        return Err(bad("name must match [a-zA-Z0-9_-]+"));
    }
    if class.is_empty() {
        return Err(bad("class is empty"));
    }
    Ok((*name, *class))
}

pub struct DurableObjectNamespaces<W: WorkersApi> {
    api: W,
    pending_updates: Vec<NamespaceUpdate>,
}

impl<W: WorkersApi> DurableObjectNamespaces<W> {
    pub fn new(api: W) -> Self {
        Self {
            api,
            pending_updates: Vec::new(),
        }
    }

    /// Find (or create) the namespace named in `spec` and return its id
    ///
    /// The remote list is read on every call, so a namespace created for an
    /// earlier binding of the same push is found. Queues an update when the namespace is bound to another script or class.
    pub fn get_or_create_namespace_id(
        &mut self,
        spec: &str,
        script_name: &str,
        events: &dyn PushEventSink,
    ) -> EdgeResult<String> {
        let (name, class) = parse_namespace_spec(spec)?;
        let existing = self
            .api
            .list_durable_object_namespaces()?
            .into_iter()
            .find(|ns| ns.name == name);
        let namespace = match existing {
            Some(ns) => ns,
            None => {
                info!(namespace = name, "creating durable object namespace");
                events.on_event(PushEvent::NamespaceCreated {
                    name: name.to_string(),
                });
                self.api.create_durable_object_namespace(name)?
            }
        };

        if namespace.class.as_deref() != Some(class)
            || namespace.script.as_deref() != Some(script_name)
        {
            self.pending_updates.push(NamespaceUpdate {
                id: namespace.id.clone(),
                name: name.to_string(),
                script: script_name.to_string(),
                class: class.to_string(),
            });
        }
        Ok(namespace.id)
    }

    pub fn has_pending_updates(&self) -> bool {
        !self.pending_updates.is_empty()
    }

    pub fn pending_updates(&self) -> &[NamespaceUpdate] {
        &self.pending_updates
    }

    /// Apply queued updates in order
    ///
    /// Stops at the first failure; updates already applied stay applied.
    /// The queue is emptied only after the full pass.
    pub fn flush_pending_updates(&mut self, events: &dyn PushEventSink) -> EdgeResult<()> {
        for update in &self.pending_updates {
            events.on_event(PushEvent::NamespaceUpdating {
                name: update.name.clone(),
                script: update.script.clone(),
                class: update.class.clone(),
            });
            self.api.update_durable_object_namespace(update)?;
        }
        self.pending_updates.clear();
        Ok(())
    }
}
