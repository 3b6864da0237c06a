//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Reconciling with an existing resource-link store
//! - Popping pages from the frontier in BFS order
//! - Fetching pages through the politeness governor
//! - Classifying links and persisting newly discovered resources
//! - Handling interrupts

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch};
use crate::crawler::links::LinkClassifier;
use crate::crawler::parser::parse_html;
use crate::crawler::politeness::Governor;
use crate::crawler::scheduler::Frontier;
use crate::output::CrawlReport;
use crate::state::{CrawlRegistry, CrawlTask};
use crate::storage::{read_links, LinkFile, OpenMode, ResourceSink};
use crate::url::normalize_url;
use crate::HarvestError;
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Main crawler structure
///
/// Owns all state for one crawl invocation, so several crawls can run in
/// the same process without sharing anything.
pub struct Crawler<S> {
    client: Client,
    classifier: LinkClassifier,
    frontier: Frontier,
    registry: CrawlRegistry<S>,
    governor: Governor,
    shutdown: Option<Arc<AtomicBool>>,
}

impl<S: ResourceSink> Crawler<S> {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `registry` - Dedup state, possibly pre-seeded with known resources
    pub fn new(config: &Config, registry: CrawlRegistry<S>) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &config.user_agent,
            config.crawler.request_timeout(),
            Some(config.crawler.domain.as_str()),
        )?;

        Ok(Self {
            client,
            classifier: LinkClassifier::from_config(&config.crawler),
            frontier: Frontier::new(config.crawler.max_depth),
            registry,
            governor: Governor::new(config.crawler.request_delay()),
            shutdown: None,
        })
    }

    /// Stops dispatching new pages once `flag` is set
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// Runs the breadth-first crawl from `seed` until the frontier is empty
    ///
    /// Per-page failures are logged and skipped. Only a failure to persist a
    /// discovered resource aborts the crawl.
    pub async fn run(&mut self, seed: Url) -> Result<CrawlReport, HarvestError> {
        let mut report = CrawlReport::start();
        report.resources_known = self.registry.resource_count();

        tracing::info!(
            "Starting crawl from {} (max depth {}, {} resources already known)",
            seed,
            self.frontier.max_depth(),
            report.resources_known
        );

        self.frontier.push(CrawlTask::new(seed, 0));

        while let Some(task) = self.next_task(&mut report) {
            tracing::info!(depth = task.depth, "Visiting {}", task.url);

            self.process_page(&task, &mut report).await?;
            report.visited.push(task);

            let pages = report.visited.len();
            if pages % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} resources found",
                    pages,
                    self.frontier.len(),
                    report.resources_discovered
                );
            }
        }

        report.finish();
        tracing::info!(
            "Crawl completed: {} pages visited, {} new resources in {:?}",
            report.visited.len(),
            report.resources_discovered,
            report.elapsed()
        );

        Ok(report)
    }

    fn next_task(&mut self, report: &mut CrawlReport) -> Option<CrawlTask> {
        if self.is_shutdown() {
            tracing::warn!(
                "Interrupted, leaving {} pages in the frontier",
                self.frontier.len()
            );
            report.interrupted = true;
            return None;
        }
        self.frontier.pop_next(&mut self.registry)
    }

    /// Fetches one page, records its resources and queues its child pages
    async fn process_page(
        &mut self,
        task: &CrawlTask,
        report: &mut CrawlReport,
    ) -> Result<(), HarvestError> {
        let result = self.governor.throttle(fetch(&self.client, &task.url)).await;

        let document = match result {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(url = %task.url, "Failed to fetch page: {}", e);
                report.pages_failed += 1;
                return Ok(());
            }
        };

        // The redirect target counts as visited too, so it is processed at most once
        if document.url != task.url && !self.registry.mark_visited(document.url.as_str()) {
            tracing::debug!(
                url = %task.url,
                "Redirected to already visited {}, skipping",
                document.url
            );
            return Ok(());
        }

        let parsed = parse_html(&document.body);
        if let Some(title) = &parsed.title {
            tracing::debug!(url = %task.url, "Page title: {}", title);
        }

        let partition = self.classifier.classify_hrefs(&document.url, &parsed.hrefs);
        report.links_off_domain += partition.off_domain;
        report.links_ignored += partition.ignored.len();

        for resource in &partition.resources {
            if self.registry.register_resource(resource.as_str())? {
                tracing::info!("Found resource: {}", resource);
                report.resources_discovered += 1;
            }
        }

        let queued = self
            .frontier
            .enqueue_children(task, partition.pages, &self.registry);
        tracing::debug!(
            url = %task.url,
            "Queued {} child pages, {} resources on page",
            queued,
            partition.resources.len()
        );

        Ok(())
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn registry(&self) -> &CrawlRegistry<S> {
        &self.registry
    }
}

/// Runs the crawl stage end to end
///
/// 1. Opens the resource-link store (truncating it when `fresh`)
/// 2. Unless `fresh`, seeds the registry from the links already stored so a
///    rerun never writes the same resource twice
/// 3. Crawls from the configured seed
///
/// # Example
///
/// ```no_run
/// use hdl_harvest::config::load_config;
/// use hdl_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = run_crawl(&config, false, None).await?;
/// println!("{} new resources", report.resources_discovered);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    fresh: bool,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<CrawlReport, HarvestError> {
    let links_path = Path::new(&config.output.links_path);
    let seed = normalize_url(&config.crawler.seed_url)?;

    let known = if !fresh && links_path.exists() {
        read_links(links_path)?
    } else {
        Vec::new()
    };

    let sink = LinkFile::open(links_path, OpenMode::from_fresh(fresh))?;
    tracing::debug!("Writing resource links to {}", sink.path().display());
    let mut registry = CrawlRegistry::new(sink);
    let seeded = registry.seed_resources(known);
    if seeded > 0 {
        tracing::info!(
            "Loaded {} known resources from {}",
            seeded,
            links_path.display()
        );
    }

    let mut crawler = Crawler::new(config, registry)?;
    if let Some(flag) = shutdown {
        crawler = crawler.with_shutdown(flag);
    }

    crawler.run(seed).await
}
