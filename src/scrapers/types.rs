use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search parameters for a marketplace scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Site entry point, e.g. "https://es.wallapop.com/"
    pub base_url: String,
    /// Text typed into the search box
    pub search_term: String,
    /// Entry picked from the "All Categories" menu
    pub category: String,
    /// Location typed into the "¿Dónde?" filter
    pub location: String,
    /// Run Chrome without a window
    pub headless: bool,
    /// Print the outcome as JSON instead of the text summary
    #[serde(default)]
    pub json_output: bool,
    #[serde(default)]
    pub waits: WaitBudgets,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            base_url: "https://es.wallapop.com/".to_string(),
            search_term: "Furgonetas".to_string(),
            category: "Coches".to_string(),
            location: "España".to_string(),
            headless: true,
            json_output: false,
            waits: WaitBudgets::default(),
        }
    }
}

impl SearchParams {
    /// Defaults overridden by `SCRAPER_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut params = Self::default();

        if let Some(base_url) = lookup("SCRAPER_BASE_URL") {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::InvalidBaseUrl(base_url));
            }
            params.base_url = base_url;
        }
        if let Some(term) = lookup("SCRAPER_SEARCH_TERM") {
            params.search_term = non_empty("SCRAPER_SEARCH_TERM", term)?;
        }
        if let Some(category) = lookup("SCRAPER_CATEGORY") {
            params.category = non_empty("SCRAPER_CATEGORY", category)?;
        }
        if let Some(location) = lookup("SCRAPER_LOCATION") {
            params.location = non_empty("SCRAPER_LOCATION", location)?;
        }
        if let Some(headless) = lookup("SCRAPER_HEADLESS") {
            params.headless = parse_bool("SCRAPER_HEADLESS", &headless)?;
        }
        if let Some(json) = lookup("SCRAPER_JSON") {
            params.json_output = parse_bool("SCRAPER_JSON", &json)?;
        }

        Ok(params)
    }

    /// Scheme and host of the base URL, used to absolutize listing hrefs
    pub fn origin(&self) -> &str {
        let url = self.base_url.as_str();
        let Some(scheme_end) = url.find("://") else {
            return url.trim_end_matches('/');
        };

        let host_start = scheme_end + 3;
        match url[host_start..].find(|c| matches!(c, '/' | '?' | '#')) {
            Some(host_len) => &url[..host_start + host_len],
            None => url,
        }
    }
}

/// Fixed pauses and element wait budgets for each step of the flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitBudgets {
    /// Pause after navigation and most clicks
    pub short_pause: Duration,
    /// Pause after picking a category or submitting the search
    pub settle_pause: Duration,
    /// Budget for search box, "Cambiar" button and location suggestion
    pub element_timeout: Duration,
    /// Budget for the "¿Dónde?" search box
    pub location_box_timeout: Duration,
    /// Budget for the first listing card to show up
    pub listings_timeout: Duration,
}

impl Default for WaitBudgets {
    fn default() -> Self {
        Self {
            short_pause: Duration::from_secs(1),
            settle_pause: Duration::from_secs(4),
            element_timeout: Duration::from_secs(10),
            location_box_timeout: Duration::from_secs(5),
            listings_timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{key} expects true/false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },

    #[error("Base URL must be http(s): {0}")]
    InvalidBaseUrl(String),
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty(key));
    }
    Ok(trimmed.to_string())
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
