//! End-of-run reports for the crawl and harvest stages

use crate::state::CrawlTask;
use chrono::{DateTime, Utc};
use std::time::Duration;

fn elapsed_between(started_at: DateTime<Utc>, finished_at: Option<DateTime<Utc>>) -> Duration {
    (finished_at.unwrap_or_else(Utc::now) - started_at)
        .to_std()
        .unwrap_or_default()
}

/// Outcome of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages processed, in dequeue order
    pub visited: Vec<CrawlTask>,

    /// Pages whose fetch failed
    pub pages_failed: usize,

    /// Resources first discovered by this run
    pub resources_discovered: usize,

    /// Resources already in the link store when the run started
    pub resources_known: usize,

    pub links_off_domain: usize,
    pub links_ignored: usize,

    /// Whether the run stopped before the frontier was empty
    pub interrupted: bool,
}

impl CrawlReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            visited: Vec::new(),
            pages_failed: 0,
            resources_discovered: 0,
            resources_known: 0,
            links_off_domain: 0,
            links_ignored: 0,
            interrupted: false,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall time of the run, up to now if it has not finished
    pub fn elapsed(&self) -> Duration {
        elapsed_between(self.started_at, self.finished_at)
    }

    /// Deepest level reached, if any page was visited
    pub fn max_depth_reached(&self) -> Option<u32> {
        self.visited.iter().map(|task| task.depth).max()
    }
}

/// Outcome of one harvest invocation
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Distinct links in the input
    pub total_urls: usize,

    /// Links that already had a dataset record
    pub skipped_existing: usize,

    pub invalid_urls: usize,
    pub fetch_failed: usize,
    pub too_short: usize,
    pub excluded: usize,
    pub not_relevant: usize,
    pub accepted: usize,

    /// Whether the run stopped before every link was processed
    pub interrupted: bool,
}

impl HarvestReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            total_urls: 0,
            skipped_existing: 0,
            invalid_urls: 0,
            fetch_failed: 0,
            too_short: 0,
            excluded: 0,
            not_relevant: 0,
            accepted: 0,
            interrupted: false,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed(&self) -> Duration {
        elapsed_between(self.started_at, self.finished_at)
    }

    /// Resources that were fetched and then rejected
    pub fn rejected(&self) -> usize {
        self.too_short + self.excluded + self.not_relevant
    }

    /// Links that reached a final outcome
    pub fn processed(&self) -> usize {
        self.skipped_existing + self.invalid_urls + self.fetch_failed + self.rejected() + self.accepted
    }
}

/// Prints a crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");

    if report.interrupted {
        println!("Status: interrupted");
    } else {
        println!("Status: completed");
    }
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Elapsed: {:.1}s", report.elapsed().as_secs_f64());
    println!();

    println!("Pages:");
    println!("  Visited: {}", report.visited.len());
    println!("  Failed: {}", report.pages_failed);
    if let Some(depth) = report.max_depth_reached() {
        println!("  Deepest level: {}", depth);
    }
    println!();

    println!("Links:");
    println!("  New resources: {}", report.resources_discovered);
    println!("  Previously known resources: {}", report.resources_known);
    println!("  Off-domain links dropped: {}", report.links_off_domain);
    println!("  Ignored links: {}", report.links_ignored);
}

/// Prints a harvest report to stdout
pub fn print_harvest_report(report: &HarvestReport) {
    println!("=== Harvest Summary ===\n");

    if report.interrupted {
        println!("Status: interrupted");
    } else {
        println!("Status: completed");
    }
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Elapsed: {:.1}s", report.elapsed().as_secs_f64());
    println!();

    println!("Resource links: {}", report.total_urls);
    println!("  Already in dataset: {}", report.skipped_existing);
    println!("  Invalid: {}", report.invalid_urls);
    println!("  Fetch failed: {}", report.fetch_failed);
    println!();

    println!("Classification:");
    println!("  Accepted: {}", report.accepted);
    println!("  Too short: {}", report.too_short);
    println!("  Excluded: {}", report.excluded);
    println!("  Not relevant: {}", report.not_relevant);

    let fetched = report.accepted + report.rejected();
    if fetched > 0 {
        println!();
        println!(
            "Acceptance Rate: {:.1}% ({} / {} fetched resources)",
            (report.accepted as f64 / fetched as f64) * 100.0,
            report.accepted,
            fetched
        );
    }
}
