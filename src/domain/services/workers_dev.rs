//! workers.dev route toggle

use crate::domain::ports::WorkersApi;
use crate::error::EdgeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkersDevOutcome {
    /// Account subdomain, the route is `<script>.<subdomain>.workers.dev`
    pub subdomain: String,
    pub changed: bool,
}

/// Flip the script's workers.dev route only if it differs from `enabled`
pub fn reconcile_workers_dev<W: WorkersApi>(
    api: &W,
    script_name: &str,
    enabled: bool,
) -> EdgeResult<WorkersDevOutcome> {
    let subdomain = api.get_workers_subdomain()?;
    let current = api.get_service_subdomain_enabled(script_name)?;
    let changed = current != enabled;
    if changed {
        api.set_service_subdomain_enabled(script_name, enabled)?;
    }
    Ok(WorkersDevOutcome { subdomain, changed })
}
