//! Crawler module for page fetching and link discovery
//!
//! This module contains the crawl stage, including:
//! - HTTP fetching with fault isolation (shared with the harvest stage)
//! - HTML parsing and link classification
//! - The BFS frontier and request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod links;
mod parser;
mod politeness;
mod scheduler;

pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{build_http_client, fetch, FetchError, FetchedDocument};
pub use links::{LinkClassifier, LinkKind, LinkPartition, LinkRejection};
pub use parser::{parse_html, ParsedPage};
pub use politeness::Governor;
pub use scheduler::Frontier;
