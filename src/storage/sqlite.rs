//! SQLite storage implementation
//!
//! This module provides the SQLite-backed implementation of the
//! CampaignStore trait.

use crate::config::OperationMode;
use crate::model::{LinkResult, LinkType, StageOutcome};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CampaignStore, StorageError, StorageResult};
use crate::storage::{CampaignRecord, Settings};
use crate::LinkampError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;

/// SQLite campaign storage backend
pub struct SqliteCampaignStore {
    conn: Connection,
}

impl SqliteCampaignStore {
    /// Creates a new SqliteCampaignStore instance
    pub fn new(path: &Path) -> Result<Self, LinkampError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, LinkampError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

const LINK_COLUMNS: &str = "url, validation, search_notify, aggregator_ping, short_link, \
     live, page_title, anchor_text, link_type, short_url, error_message, critical, \
     last_processed_at, last_checked_at";

/// Maps one `links` row (selected with [`LINK_COLUMNS`]) to a LinkResult
fn row_to_link_result(row: &Row<'_>) -> rusqlite::Result<LinkResult> {
    let mut result = LinkResult::new(row.get::<_, String>(0)?);

    result.validation = parse_outcome(&row.get::<_, String>(1)?);
    result.search_notify = parse_outcome(&row.get::<_, String>(2)?);
    result.aggregator_ping = parse_outcome(&row.get::<_, String>(3)?);
    result.short_link = parse_outcome(&row.get::<_, String>(4)?);
    result.live = row.get::<_, Option<bool>>(5)?;
    result.page_title = row.get(6)?;
    result.anchor_text = row.get(7)?;
    result.link_type =
        LinkType::from_db_string(&row.get::<_, String>(8)?).unwrap_or(LinkType::Unknown);
    result.short_url = row.get(9)?;
    result.error_message = row.get(10)?;
    result.critical = row.get(11)?;
    result.last_processed_at = parse_timestamp(row.get::<_, Option<String>>(12)?);
    result.last_checked_at = parse_timestamp(row.get::<_, Option<String>>(13)?);

    Ok(result)
}

/// Unknown outcome strings degrade to NotRun rather than failing the load
fn parse_outcome(s: &str) -> StageOutcome {
    StageOutcome::from_db_string(s).unwrap_or(StageOutcome::NotRun)
}

fn parse_timestamp(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

fn format_timestamp(ts: &Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|dt| dt.to_rfc3339())
}

impl CampaignStore for SqliteCampaignStore {
    // ===== Campaign Management =====

    fn create_campaign(&mut self, name: &str, target_domain: &str) -> StorageResult<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM campaigns WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(StorageError::DuplicateCampaign(name.to_string()));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO campaigns (name, target_domain, created_at) VALUES (?1, ?2, ?3)",
            params![name, target_domain, now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_campaign(&self, campaign_id: i64) -> StorageResult<CampaignRecord> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, target_domain, created_at FROM campaigns WHERE id = ?1",
        )?;

        stmt.query_row(params![campaign_id], |row| {
            Ok(CampaignRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                target_domain: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .map_err(|_| StorageError::CampaignNotFound(format!("id {}", campaign_id)))
    }

    fn get_campaign_by_name(&self, name: &str) -> StorageResult<Option<CampaignRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, target_domain, created_at FROM campaigns WHERE name = ?1",
        )?;

        let campaign = stmt
            .query_row(params![name], |row| {
                Ok(CampaignRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    target_domain: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .optional()?;

        Ok(campaign)
    }

    fn list_campaigns(&self) -> StorageResult<Vec<CampaignRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, target_domain, created_at FROM campaigns ORDER BY id",
        )?;

        let campaigns = stmt
            .query_map([], |row| {
                Ok(CampaignRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    target_domain: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(campaigns)
    }

    fn delete_campaign(&mut self, campaign_id: i64) -> StorageResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM campaigns WHERE id = ?1", params![campaign_id])?;

        if deleted == 0 {
            return Err(StorageError::CampaignNotFound(format!("id {}", campaign_id)));
        }

        Ok(())
    }

    // ===== Link Results =====

    fn link_urls(&self, campaign_id: i64) -> StorageResult<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM links WHERE campaign_id = ?1")?;

        let urls = stmt
            .query_map(params![campaign_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;

        Ok(urls)
    }

    fn append_links(&mut self, campaign_id: i64, results: &[LinkResult]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO links (campaign_id, {LINK_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ))?;

            for result in results {
                stmt.execute(params![
                    campaign_id,
                    result.url,
                    result.validation.to_db_string(),
                    result.search_notify.to_db_string(),
                    result.aggregator_ping.to_db_string(),
                    result.short_link.to_db_string(),
                    result.live,
                    result.page_title,
                    result.anchor_text,
                    result.link_type.to_db_string(),
                    result.short_url,
                    result.error_message,
                    result.critical,
                    format_timestamp(&result.last_processed_at),
                    format_timestamp(&result.last_checked_at),
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn load_links(&self, campaign_id: i64) -> StorageResult<Vec<LinkResult>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE campaign_id = ?1 ORDER BY id"
        ))?;

        let links = stmt
            .query_map(params![campaign_id], row_to_link_result)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(links)
    }

    fn update_link_checks(
        &mut self,
        campaign_id: i64,
        results: &[LinkResult],
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE links SET validation = ?1, live = ?2, page_title = ?3, \
                 anchor_text = ?4, link_type = ?5, last_checked_at = ?6 \
                 WHERE campaign_id = ?7 AND url = ?8",
            )?;

            for result in results {
                stmt.execute(params![
                    result.validation.to_db_string(),
                    result.live,
                    result.page_title,
                    result.anchor_text,
                    result.link_type.to_db_string(),
                    format_timestamp(&result.last_checked_at),
                    campaign_id,
                    result.url,
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn count_links(&self, campaign_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM links WHERE campaign_id = ?1",
            params![campaign_id],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    // ===== Settings =====

    fn load_settings(&self) -> StorageResult<Settings> {
        let mode: String = self.conn.query_row(
            "SELECT operation_mode FROM settings WHERE id = 1",
            [],
            |row| row.get(0),
        )?;

        let operation_mode = OperationMode::from_db_string(&mode)
            .ok_or_else(|| StorageError::Corrupt(format!("unknown operation mode '{}'", mode)))?;

        Ok(Settings { operation_mode })
    }

    fn save_settings(&mut self, settings: &Settings) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE settings SET operation_mode = ?1 WHERE id = 1",
            params![settings.operation_mode.to_db_string()],
        )?;

        Ok(())
    }
}
