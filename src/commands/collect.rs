//! Collect command implementation.

use crate::config::Config;
use crate::exhibitor::models::hits;
use crate::exhibitor::{flatten, ExhibitorClient, ExhibitorSearch, FlatRecord};
use crate::export::{self, Exporter};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a collect run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    /// Pages that returned at least one hit
    pub pages_collected: u32,
    /// Last page number requested
    pub last_page: Option<u32>,
    /// Rows gathered across all pages
    pub records: usize,
    /// Output files, empty when nothing was collected
    pub files: Vec<PathBuf>,
}

impl CollectSummary {
    /// One-line human summary.
    pub fn describe(&self) -> String {
        if self.records == 0 {
            return "No data collected. Check API key, event ID and parameters.".to_string();
        }

        let files: Vec<String> = self.files.iter().map(|p| p.display().to_string()).collect();
        format!(
            "Collected {} exhibitors from {} pages. Saved: {}",
            self.records,
            self.pages_collected,
            files.join(", ")
        )
    }
}

/// Pages through the exhibitor search and exports the flattened rows.
pub struct CollectCommand {
    config: Config,
}

impl CollectCommand {
    /// Creates a new collect command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs against the live API with the exporter this build supports.
    pub async fn execute(&self) -> Result<CollectSummary> {
        self.config.validate()?;

        let client = ExhibitorClient::new(&self.config).context("Failed to create HTTP client")?;
        let exporter = export::select(&self.config);

        self.execute_with(&client, exporter.as_ref()).await
    }

    /// Runs with a provided client and exporter (for testing).
    pub async fn execute_with(
        &self,
        client: &impl ExhibitorSearch,
        exporter: &dyn Exporter,
    ) -> Result<CollectSummary> {
        let (records, mut summary) = self.collect(client).await?;

        if records.is_empty() {
            warn!("No data collected. Check API key, event ID and parameters.");
            return Ok(summary);
        }

        debug!("Exporting {} rows via {}", records.len(), exporter.name());
        summary.files = exporter.export(&records)?;
        Ok(summary)
    }

    /// Fetches pages until one comes back empty or the page cap is passed.
    pub async fn collect(
        &self,
        client: &impl ExhibitorSearch,
    ) -> Result<(Vec<FlatRecord>, CollectSummary)> {
        let mut records: Vec<FlatRecord> = Vec::new();
        let mut summary = CollectSummary::default();
        let mut page = self.config.start_page;

        info!("Collecting exhibitors for {}", self.config.event_id);
        loop {
            if self.config.max_pages.is_some_and(|max| page > max) {
                debug!("Reached page cap {:?}", self.config.max_pages);
                break;
            }

            let response = client
                .fetch_page(page)
                .await
                .with_context(|| format!("Failed to fetch page {}", page))?;
            summary.last_page = Some(page);

            let page_hits = hits(&response);
            if page_hits.is_empty() {
                info!("Done. Stopped at page {} (no more results)", page);
                break;
            }

            records.extend(page_hits.iter().map(flatten));
            summary.pages_collected += 1;
            info!("Page {}: +{} rows (total={})", page, page_hits.len(), records.len());

            page += 1;
            if !self.config.delay().is_zero() {
                tokio::time::sleep(self.config.delay()).await;
            }
        }

        summary.records = records.len();
        Ok((records, summary))
    }
}
