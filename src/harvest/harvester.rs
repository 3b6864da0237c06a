//! Harvest stage orchestration
//!
//! Drains the resource-link store in order:
//! - Each URL is fetched once through the politeness governor
//! - Fetched content is judged by the relevance policy
//! - Accepted resources are written to the dataset store immediately
//!
//! Per-item failures are counted and skipped. Only a storage failure ends
//! the run early.

use crate::config::Config;
use crate::crawler::{build_http_client, fetch, Governor};
use crate::harvest::emitter::DatasetEmitter;
use crate::harvest::relevance::{Rejection, RelevancePolicy, Verdict};
use crate::output::HarvestReport;
use crate::storage::{read_links, read_records, DatasetFile, OpenMode, RecordSink};
use crate::url::{last_path_segment, normalize_url};
use crate::HarvestError;
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fetches, classifies and emits resources from a list of links
pub struct Harvester<S> {
    client: Client,
    governor: Governor,
    policy: RelevancePolicy,
    emitter: DatasetEmitter<S>,
    emitted: HashSet<String>,
    shutdown: Option<Arc<AtomicBool>>,
}

impl<S: RecordSink> Harvester<S> {
    /// Creates a harvester writing records to `sink`
    ///
    /// # Arguments
    ///
    /// * `config` - Full configuration; the `[harvest]` table drives pacing
    ///   and classification, the crawler's resource extension drives prompts
    /// * `sink` - Destination for accepted records
    pub fn new(config: &Config, sink: S) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &config.user_agent,
            config.harvest.request_timeout(),
            Some(config.crawler.domain.as_str()),
        )?;
        let policy = RelevancePolicy::from_config(&config.harvest)?;

        Ok(Self {
            client,
            governor: Governor::new(config.harvest.request_delay()),
            policy,
            emitter: DatasetEmitter::new(
                sink,
                &config.harvest,
                config.crawler.resource_extension.as_str(),
            ),
            emitted: HashSet::new(),
            shutdown: None,
        })
    }

    /// Marks source URLs that already have a record so they are not fetched again
    pub fn seed_emitted<I, T>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let before = self.emitted.len();
        self.emitted.extend(urls.into_iter().map(Into::into));
        self.emitted.len() - before
    }

    /// Stops dispatching new fetches once `flag` is set
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// Processes every link in order, one request at a time
    ///
    /// Duplicate links are collapsed, keeping the first occurrence.
    pub async fn run<T: AsRef<str>>(&mut self, links: &[T]) -> Result<HarvestReport, HarvestError> {
        let mut report = HarvestReport::start();
        let mut seen = HashSet::new();
        let links: Vec<&str> = links
            .iter()
            .map(|link| link.as_ref().trim())
            .filter(|link| !link.is_empty() && seen.insert(*link))
            .collect();
        report.total_urls = links.len();

        tracing::info!(
            "Starting harvest of {} resource links ({} already emitted)",
            report.total_urls,
            self.emitted.len()
        );

        for (index, link) in links.iter().enumerate() {
            if self.is_shutdown() {
                tracing::warn!(
                    "Interrupted, {} resource links left unprocessed",
                    links.len() - index
                );
                report.interrupted = true;
                break;
            }

            self.process_link(link, &mut report).await?;

            let done = index + 1;
            if done % 10 == 0 {
                tracing::info!(
                    "Progress: {}/{} links processed, {} accepted",
                    done,
                    report.total_urls,
                    report.accepted
                );
            }
        }

        report.finish();
        tracing::info!(
            "Harvest completed: {} accepted out of {} links in {:?}",
            report.accepted,
            report.total_urls,
            report.elapsed()
        );

        Ok(report)
    }

    async fn process_link(
        &mut self,
        link: &str,
        report: &mut HarvestReport,
    ) -> Result<(), HarvestError> {
        let url = match normalize_url(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = link, "Skipping invalid resource link: {}", e);
                report.invalid_urls += 1;
                return Ok(());
            }
        };

        if self.emitted.contains(url.as_str()) {
            tracing::debug!(url = %url, "Already in dataset, skipping");
            report.skipped_existing += 1;
            return Ok(());
        }

        let Some(filename) = last_path_segment(&url) else {
            tracing::warn!(url = %url, "Resource link has no filename");
            report.invalid_urls += 1;
            return Ok(());
        };

        let document = match self.governor.throttle(fetch(&self.client, &url)).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(url = %url, "Failed to fetch resource: {}", e);
                report.fetch_failed += 1;
                return Ok(());
            }
        };

        let content = document.body.trim();
        match self.policy.classify(&filename, content) {
            Verdict::Accepted {
                keyword,
                matched_on,
            } => {
                let record = self.emitter.build_record(&url, &filename, content);
                self.emitter.emit(&record)?;
                self.emitted.insert(record.source_url);
                report.accepted += 1;
                tracing::info!(
                    url = %url,
                    keyword = %keyword,
                    "Accepted {} (matched on {:?})",
                    filename,
                    matched_on
                );
            }
            Verdict::Rejected(rejection) => {
                match &rejection {
                    Rejection::ContentTooShort { .. } => report.too_short += 1,
                    Rejection::Excluded { .. } => report.excluded += 1,
                    Rejection::NotRelevant => report.not_relevant += 1,
                }
                tracing::debug!(url = %url, "Rejected {}: {}", filename, rejection);
            }
        }

        Ok(())
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn into_sink(self) -> S {
        self.emitter.into_sink()
    }
}

/// Runs the harvest stage end to end
///
/// Fails with `MissingInputStore` before touching the network or creating
/// the dataset store when the resource-link store does not exist. Unless
/// `fresh`, URLs already present in the dataset store are skipped.
pub async fn run_harvest(
    config: &Config,
    fresh: bool,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<HarvestReport, HarvestError> {
    let links_path = Path::new(&config.output.links_path);
    if !links_path.is_file() {
        return Err(HarvestError::MissingInputStore {
            path: links_path.to_path_buf(),
        });
    }

    let links = read_links(links_path)?;
    let dataset_path = Path::new(&config.output.dataset_path);

    let existing = if !fresh && dataset_path.exists() {
        let stored = read_records(dataset_path)?;
        if stored.malformed_lines > 0 {
            tracing::warn!(
                "{} malformed lines in {}",
                stored.malformed_lines,
                dataset_path.display()
            );
        }
        stored.records
    } else {
        Vec::new()
    };

    let sink = DatasetFile::open(dataset_path, OpenMode::from_fresh(fresh))?;
    tracing::debug!("Writing dataset records to {}", sink.path().display());
    let mut harvester = Harvester::new(config, sink)?;

    let seeded = harvester.seed_emitted(existing.into_iter().map(|record| record.source_url));
    if seeded > 0 {
        tracing::info!(
            "Loaded {} existing records from {}",
            seeded,
            dataset_path.display()
        );
    }

    if let Some(flag) = shutdown {
        harvester = harvester.with_shutdown(flag);
    }

    harvester.run(&links).await
}
