//! Durable object class deletion migrations

use crate::domain::ports::Migrations;

/// `delete-A-B` migration for the given classes, none for an empty list
pub fn compute_migrations(delete_classes: &[String]) -> Option<Migrations> {
    if delete_classes.is_empty() {
        return None;
    }
    Some(Migrations {
        tag: format!("delete-{}", delete_classes.join("-")),
        deleted_classes: delete_classes.to_vec(),
    })
}
