//! Domain Services
//!
//! Business logic of a push. Everything remote goes through the ports, so
//! these services are testable with in-memory mocks.

pub mod asset_negotiator;
pub mod binding_resolver;
pub mod custom_domains;
pub mod do_namespaces;
pub mod import_rewriter;
pub mod migrations;
pub mod size_report;
pub mod workers_dev;

pub use asset_negotiator::{environment_differs, select_missing};
pub use binding_resolver::{
    compute_environment_variables, compute_workers_bindings, expand_macros,
    parse_secret_key, parse_service_environment, resolve_bindings, resolve_bindings_with,
    SecretKeyDef, WorkersBindingContext,
};
pub use custom_domains::{ensure_custom_domain, find_parent_zone, ZONES_PER_PAGE};
pub use do_namespaces::{parse_namespace_spec, DurableObjectNamespaces};
pub use import_rewriter::{
    replace_imports, resolve_specifier, rewrite_for_deploy, rewrite_for_workers,
    rewrite_sockets, ImportKind, LocalImport,
};
pub use migrations::compute_migrations;
pub use size_report::{compute_sizes, gzip_len, SizeReport};
pub use workers_dev::{reconcile_workers_dev, WorkersDevOutcome};
