//! Canonical migration definitions.

/// A named migration: `(name, sql)`.
pub type Migration = (&'static str, &'static str);

/// Schema migrations, applied in order and recorded in `_migrations`.
pub const MIGRATIONS: &[Migration] = &[(
    "0001_schema",
    include_str!("../../migrations/0001_schema.sql"),
)];

/// Bookkeeping table for applied migrations.
pub const MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);";
