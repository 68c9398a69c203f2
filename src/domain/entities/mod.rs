//! Domain Entities
//!
//! - `Binding` - a user-declared runtime binding
//! - `Part` / `Parts` - auxiliary blobs uploaded with a Workers script
//! - `DeployFiles` - content-addressed files of a Deno Deploy push
//! - remote records (namespaces, zones, databases, backups, projects)

mod binding;
mod deploy_files;
mod part;
mod remote;

pub use binding::{Binding, BindingKind, BindingTable};
pub use deploy_files::{AssetManifest, DeployFiles, FileEntry, ManifestEntry, ManifestEntryKind};
pub use part::{Part, Parts};
pub use remote::{
    D1Backup, D1Database, DeployProject, DeploymentRef, DurableObjectNamespace,
    ProductionDeployment, Zone,
};
