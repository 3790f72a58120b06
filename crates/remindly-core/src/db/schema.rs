//! SQLite schema definition.

/// Complete database schema for remindly.
///
/// A single flat key-value table: each key names a record collection and
/// holds the full collection as a JSON-encoded array. Collections are read
/// and written whole; there are no per-record rows.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Record Collections
-- ============================================================================

CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
