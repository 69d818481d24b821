//! Storage module for persisting campaigns
//!
//! This module owns all database operations for the tool:
//! - SQLite database initialization and schema management
//! - Campaign records and their accumulated link results
//! - The persisted settings record (operation mode)
//!
//! The pipeline itself never touches storage; the caller reads the existing
//! URL set before a batch run and appends the new results after it.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteCampaignStore;
pub use traits::{CampaignStore, StorageError, StorageResult};

use crate::config::OperationMode;
use crate::LinkampError;
use std::path::Path;

/// Initializes or opens a campaign database
pub fn open_storage(path: &Path) -> Result<SqliteCampaignStore, LinkampError> {
    SqliteCampaignStore::new(path)
}

/// A named campaign grouping a target domain and its links
#[derive(Debug, Clone)]
pub struct CampaignRecord {
    pub id: i64,
    pub name: String,
    pub target_domain: String,
    pub created_at: String,
}

/// Persisted application settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub operation_mode: OperationMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operation_mode: OperationMode::Standard,
        }
    }
}
