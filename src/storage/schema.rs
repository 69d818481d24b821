//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the LinkAmp campaign
//! database.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Named campaigns, one target domain each
CREATE TABLE IF NOT EXISTS campaigns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    target_domain TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Accumulated link results per campaign
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
    url TEXT NOT NULL,
    validation TEXT NOT NULL,
    search_notify TEXT NOT NULL,
    aggregator_ping TEXT NOT NULL,
    short_link TEXT NOT NULL,
    live INTEGER,
    page_title TEXT,
    anchor_text TEXT,
    link_type TEXT NOT NULL,
    short_url TEXT,
    error_message TEXT,
    critical INTEGER NOT NULL DEFAULT 0,
    last_processed_at TEXT,
    last_checked_at TEXT,
    UNIQUE(campaign_id, url)
);

CREATE INDEX IF NOT EXISTS idx_links_campaign ON links(campaign_id);
CREATE INDEX IF NOT EXISTS idx_links_url ON links(campaign_id, url);

-- Single-row settings record
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    operation_mode TEXT NOT NULL
);

INSERT OR IGNORE INTO settings (id, operation_mode) VALUES (1, 'standard');
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
