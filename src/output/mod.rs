//! Output module for run summaries and store statistics
//!
//! This module handles:
//! - Per-run reports for the crawl and harvest stages
//! - Statistics over the existing output stores

mod report;
pub mod stats;

pub use report::{print_crawl_report, print_harvest_report, CrawlReport, HarvestReport};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
