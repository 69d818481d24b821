//! Storage traits and error types

use crate::model::LinkResult;
use crate::storage::{CampaignRecord, Settings};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("Campaign already exists: {0}")]
    DuplicateCampaign(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for campaign storage backends
pub trait CampaignStore {
    // ===== Campaign Management =====

    /// Creates a new campaign. Fails if the name is already taken.
    fn create_campaign(&mut self, name: &str, target_domain: &str) -> StorageResult<i64>;

    /// Gets a campaign by ID
    fn get_campaign(&self, campaign_id: i64) -> StorageResult<CampaignRecord>;

    /// Gets a campaign by name
    fn get_campaign_by_name(&self, name: &str) -> StorageResult<Option<CampaignRecord>>;

    /// Lists all campaigns, oldest first
    fn list_campaigns(&self) -> StorageResult<Vec<CampaignRecord>>;

    /// Deletes a campaign and all its links
    fn delete_campaign(&mut self, campaign_id: i64) -> StorageResult<()>;

    // ===== Link Results =====

    /// Returns the set of URLs already stored for a campaign (for dedup)
    fn link_urls(&self, campaign_id: i64) -> StorageResult<HashSet<String>>;

    /// Appends freshly produced link results to a campaign
    fn append_links(&mut self, campaign_id: i64, results: &[LinkResult]) -> StorageResult<()>;

    /// Loads all link results of a campaign in insertion order
    fn load_links(&self, campaign_id: i64) -> StorageResult<Vec<LinkResult>>;

    /// Overwrites the liveness fields of existing links after a monitoring
    /// run: validation outcome, live, page title, anchor text, link type,
    /// and last-checked timestamp. All other columns stay untouched.
    fn update_link_checks(&mut self, campaign_id: i64, results: &[LinkResult])
        -> StorageResult<()>;

    /// Counts the links stored for a campaign
    fn count_links(&self, campaign_id: i64) -> StorageResult<u64>;

    // ===== Settings =====

    /// Loads the persisted settings record
    fn load_settings(&self) -> StorageResult<Settings>;

    /// Saves the persisted settings record
    fn save_settings(&mut self, settings: &Settings) -> StorageResult<()>;
}
