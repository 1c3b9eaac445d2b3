use crate::models::{ListingRecord, ScrapeOutcome};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

/// Common trait for marketplace scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Scrape listings from the source
    async fn scrape(&self) -> Result<Vec<ListingRecord>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;

    /// Run a scrape and fold any failure into the outcome
    async fn run(&self) -> ScrapeOutcome {
        match self.scrape().await {
            Ok(listings) => {
                info!("{} scrape finished with {} listings", self.source_name(), listings.len());
                ScrapeOutcome::Listings { listings }
            }
            Err(e) => {
                error!("{} scrape failed: {:#}", self.source_name(), e);
                ScrapeOutcome::Failed {
                    message: format!("{:#}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FixedScraper {
        result: fn() -> Result<Vec<ListingRecord>>,
    }

    #[async_trait]
    impl ScraperTrait for FixedScraper {
        async fn scrape(&self) -> Result<Vec<ListingRecord>> {
            (self.result)()
        }

        fn source_name(&self) -> &'static str {
            "Fixed"
        }
    }

    #[tokio::test]
    async fn test_run_success() {
        let scraper = FixedScraper {
            result: || {
                Ok(vec![ListingRecord {
                    title: Some("Peugeot Partner".to_string()),
                    ..ListingRecord::empty()
                }])
            },
        };

        let outcome = scraper.run().await;
        assert!(!outcome.is_failure());
        assert_eq!(outcome.listings().len(), 1);
    }

    #[tokio::test]
    async fn test_run_empty_is_not_failure() {
        let scraper = FixedScraper { result: || Ok(Vec::new()) };

        let outcome = scraper.run().await;
        assert_eq!(outcome, ScrapeOutcome::Listings { listings: Vec::new() });
    }

    #[tokio::test]
    async fn test_run_failure_becomes_outcome() {
        let scraper = FixedScraper {
            result: || Err(anyhow!("no node found").context("Clicking 'Cambiar'")),
        };

        let outcome = scraper.run().await;
        match outcome {
            ScrapeOutcome::Failed { message } => {
                assert!(message.contains("Clicking 'Cambiar'"));
                assert!(message.contains("no node found"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
