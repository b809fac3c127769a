//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (global scope)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD company ON TABLE user TYPE string DEFAULT '';
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['user', 'admin'];
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['pending', 'approved', 'rejected'];
DEFINE FIELD reviewed_by ON TABLE user TYPE option<string>;
DEFINE FIELD reviewed_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_status ON TABLE user COLUMNS status;

-- =======================================================================
-- Sessions (global scope)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD role ON TABLE session TYPE string \
    ASSERT $value IN ['user', 'admin'];
DEFINE FIELD email ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD last_seen_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- =======================================================================
-- Products (owner scope)
-- =======================================================================
DEFINE TABLE product SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE product TYPE string;
DEFINE FIELD item_code ON TABLE product TYPE string;
DEFINE FIELD name ON TABLE product TYPE string;
DEFINE FIELD quantity ON TABLE product TYPE int \
    ASSERT $value >= 0;
DEFINE FIELD brand ON TABLE product TYPE string;
DEFINE FIELD manufacturing_date ON TABLE product TYPE string;
DEFINE FIELD expiration_date ON TABLE product TYPE string;
DEFINE FIELD description ON TABLE product TYPE option<string>;
DEFINE FIELD created_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_product_owner_code ON TABLE product \
    COLUMNS owner_id, item_code UNIQUE;
DEFINE INDEX idx_product_owner_time ON TABLE product \
    COLUMNS owner_id, created_at;

-- =======================================================================
-- Item code counters (one record per owner, keyed by owner id)
-- =======================================================================
DEFINE TABLE item_counter SCHEMAFULL;
DEFINE FIELD last ON TABLE item_counter TYPE int DEFAULT 0;

-- =======================================================================
-- Activity feed (owner scope, append-only)
-- =======================================================================
DEFINE TABLE activity SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD owner_id ON TABLE activity TYPE string;
DEFINE FIELD message ON TABLE activity TYPE string;
DEFINE FIELD created_at ON TABLE activity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_activity_owner_time ON TABLE activity \
    COLUMNS owner_id, created_at;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client and
/// return how many were applied.
///
/// Creates a `_migration` tracking table on first run, then applies each
/// migration whose version exceeds the recorded maximum. A migration and
/// its tracking record are committed in one transaction, so a failed
/// migration leaves no partial schema behind.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<usize, DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();

    for migration in &pending {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        let script = format!(
            "BEGIN TRANSACTION;\n{}\n\
             CREATE _migration SET version = $version, name = $name;\n\
             COMMIT TRANSACTION;",
            migration.sql
        );
        db.query(&script)
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;
    }

    if pending.is_empty() {
        info!(version = current_version, "Schema is up to date");
    } else {
        info!(applied = pending.len(), "Migrations applied successfully");
    }

    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
