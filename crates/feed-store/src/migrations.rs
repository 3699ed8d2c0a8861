//! Embedded schema, executed on every open. Statements are idempotent.

use crate::error::StoreError;

const MIGRATION_001: &str = include_str!("../migrations/001_studies.sql");

pub(crate) async fn run_migrations(conn: &libsql::Connection) -> Result<(), StoreError> {
    conn.execute_batch(MIGRATION_001)
        .await
        .map_err(|e| StoreError::Migration(format!("001_studies: {e}")))?;
    Ok(())
}
