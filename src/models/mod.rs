use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown wherever a listing field could not be read
pub const MISSING: &str = "N/A";

/// One advertisement scraped from the search results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub title: Option<String>,
    pub price: Option<String>,
    pub url: Option<String>,
    /// Compound field as shown on the card, e.g. "2018 · 45.000 km · Diésel · 120 cv"
    pub attributes_raw: Option<String>,
    pub year: Option<String>,
    pub mileage: Option<String>,
    pub fuel: Option<String>,
    pub power: Option<String>,
    pub description: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl ListingRecord {
    /// Record with every field absent
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            title: None,
            price: None,
            url: None,
            attributes_raw: None,
            year: None,
            mileage: None,
            fuel: None,
            power: None,
            description: None,
            scraped_at: Utc::now(),
        }
    }

    /// Render an optional field for display
    pub fn display(field: &Option<String>) -> &str {
        field.as_deref().unwrap_or(MISSING)
    }
}

/// Result of one scraping run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrapeOutcome {
    Listings { listings: Vec<ListingRecord> },
    Failed { message: String },
}

impl ScrapeOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScrapeOutcome::Failed { .. })
    }

    /// Scraped records, empty when the run failed
    pub fn listings(&self) -> &[ListingRecord] {
        match self {
            ScrapeOutcome::Listings { listings } => listings,
            ScrapeOutcome::Failed { .. } => &[],
        }
    }
}
