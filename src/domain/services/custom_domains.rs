//! Custom domain reconciliation
//!
//! A hostname is bound through its unique parent zone. The bind call is
//! idempotent remotely, so re-running a push with the same domains changes
//! nothing.

use tracing::debug;

use crate::domain::entities::Zone;
use crate::domain::ports::{PushEvent, PushEventSink, WorkersApi, WorkersDomain};
use crate::error::{EdgeError, EdgeResult};

/// Enough to see every zone of a typical account in one page
pub const ZONES_PER_PAGE: u32 = 1000;

/// Pick the single zone that `hostname` is or belongs to, and check it is usable
pub fn find_parent_zone<'z>(hostname: &str, zones: &'z [Zone]) -> EdgeResult<&'z Zone> {
    let candidates: Vec<&Zone> = zones
        .iter()
        .filter(|zone| hostname == zone.name || hostname.ends_with(&format!(".{}", zone.name)))
        .collect();
    let zone = match candidates.as_slice() {
        [] => {
            return Err(EdgeError::ZoneNotFound {
                hostname: hostname.to_string(),
            })
        }
        [zone] => *zone,
        many => {
            return Err(EdgeError::ZoneAmbiguous {
                hostname: hostname.to_string(),
                candidates: many
                    .iter()
                    .map(|z| z.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    };

    let unusable = |reason: String| EdgeError::ZoneNotUsable {
        zone: zone.name.clone(),
        hostname: hostname.to_string(),
        reason,
    };
    if zone.paused {
        return Err(unusable("zone is paused".to_string()));
    }
    if zone.status != "active" {
        return Err(unusable(format!("status is {}, expected active", zone.status)));
    }
    if zone.zone_type != "full" {
        return Err(unusable(format!("type is {}, expected full", zone.zone_type)));
    }
    Ok(zone)
}

/// Bind `hostname` to the production environment of `script_name`
pub fn ensure_custom_domain<W: WorkersApi>(
    api: &W,
    hostname: &str,
    zones: &[Zone],
    script_name: &str,
    events: &dyn PushEventSink,
) -> EdgeResult<()> {
    events.on_event(PushEvent::CustomDomainEnsuring {
        hostname: hostname.to_string(),
        script: script_name.to_string(),
    });
    let zone = find_parent_zone(hostname, zones)?;
    debug!(hostname, zone = %zone.name, "binding custom domain");
    api.put_workers_domain(&WorkersDomain {
        zone_id: zone.id.clone(),
        hostname: hostname.to_string(),
        service: script_name.to_string(),
        environment: "production".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> Zone {
        Zone {
            id: format!("id-{name}"),
            name: name.to_string(),
            status: "active".to_string(),
            paused: false,
            zone_type: "full".to_string(),
        }
    }

    #[test]
    fn subdomain_matches_parent_zone() {
        let zones = vec![zone("example.com"), zone("other.com")];
        let found = find_parent_zone("api.example.com", &zones).unwrap();
        assert_eq!(found.id, "id-example.com");
    }

    #[test]
    fn apex_matches_itself() {
        let zones = vec![zone("example.com")];
        assert!(find_parent_zone("example.com", &zones).is_ok());
    }

    #[test]
    fn suffix_without_dot_does_not_match() {
        let zones = vec![zone("example.com")];
        let err = find_parent_zone("notexample.com", &zones).unwrap_err();
        assert_eq!(err.kind(), "zone-not-found");
    }

    #[test]
    fn nested_zones_are_ambiguous() {
        let zones = vec![zone("example.com"), zone("api.example.com")];
        let err = find_parent_zone("v1.api.example.com", &zones).unwrap_err();
        assert_eq!(err.kind(), "zone-ambiguous");
        assert!(err.to_string().contains("example.com, api.example.com"));
    }

    #[test]
    fn paused_zone_is_not_usable() {
        let mut paused = zone("example.com");
        paused.paused = true;
        let err = find_parent_zone("api.example.com", &[paused]).unwrap_err();
        assert_eq!(err.kind(), "zone-not-usable");
    }

    #[test]
    fn partial_zone_is_not_usable() {
        let mut partial = zone("example.com");
        partial.zone_type = "partial".to_string();
        let err = find_parent_zone("example.com", &[partial]).unwrap_err();
        assert!(err.to_string().contains("type is partial"));
    }
}
