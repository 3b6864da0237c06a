//! Statistics over the existing output stores
//!
//! Used by the `stats` command; reads both stores without modifying them.

use crate::config::OutputConfig;
use crate::storage::{read_links, read_records};
use crate::HarvestError;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Counts gathered from the link and dataset stores
#[derive(Debug, Clone, Default)]
pub struct StoreStatistics {
    /// Non-blank lines in the resource-link store
    pub resource_links: usize,

    /// Distinct URLs in the resource-link store
    pub unique_resource_links: usize,

    /// Valid records in the dataset store
    pub dataset_records: usize,

    /// Lines in the dataset store that did not parse as records
    pub malformed_records: usize,

    /// Record count per category tag
    pub records_by_category: BTreeMap<String, usize>,

    /// Record count per source tag
    pub records_by_source: BTreeMap<String, usize>,
}

/// Loads statistics from the configured stores
///
/// A store that does not exist yet counts as empty.
///
/// # Arguments
///
/// * `output` - Paths of the two stores
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - A store exists but could not be read
pub fn load_statistics(output: &OutputConfig) -> Result<StoreStatistics, HarvestError> {
    let mut stats = StoreStatistics::default();

    let links_path = Path::new(&output.links_path);
    if links_path.exists() {
        let links = read_links(links_path)?;
        stats.resource_links = links.len();
        stats.unique_resource_links = links.iter().collect::<HashSet<_>>().len();
    }

    let dataset_path = Path::new(&output.dataset_path);
    if dataset_path.exists() {
        let stored = read_records(dataset_path)?;
        stats.dataset_records = stored.records.len();
        stats.malformed_records = stored.malformed_lines;

        for record in &stored.records {
            *stats
                .records_by_category
                .entry(record.provenance.category.clone())
                .or_default() += 1;
            *stats
                .records_by_source
                .entry(record.provenance.source.clone())
                .or_default() += 1;
        }
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Resource Links:");
    println!("  Total lines: {}", stats.resource_links);
    println!("  Unique URLs: {}", stats.unique_resource_links);
    println!();

    println!("Dataset:");
    println!("  Records: {}", stats.dataset_records);
    if stats.malformed_records > 0 {
        println!("  Malformed lines: {}", stats.malformed_records);
    }
    println!();

    if !stats.records_by_category.is_empty() {
        println!("Records by Category:");
        for (category, count) in &stats.records_by_category {
            println!("  {}: {}", category, count);
        }
        println!();
    }

    if !stats.records_by_source.is_empty() {
        println!("Records by Source:");
        for (source, count) in &stats.records_by_source {
            println!("  {}: {}", source, count);
        }
        println!();
    }

    let yield_rate = if stats.unique_resource_links > 0 {
        (stats.dataset_records as f64 / stats.unique_resource_links as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Dataset Yield: {:.1}% ({} / {} resource links)",
        yield_rate, stats.dataset_records, stats.unique_resource_links
    );
}
