//! Output module for exporting and reporting campaign results
//!
//! This module handles:
//! - CSV export of a campaign's accumulated link results
//! - The post-batch text summary table

mod csv_export;
mod summary;

pub use csv_export::{export_campaign_csv, write_links_csv};
pub use summary::{print_summary, render_summary};
