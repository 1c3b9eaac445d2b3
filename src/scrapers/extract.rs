use crate::models::ListingRecord;
use anyhow::{anyhow, Result};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Separator between the parts of the attributes line on a card
pub const ATTRIBUTE_SEPARATOR: char = '·';

/// A single listing card on the results page
pub trait ListingHandle {
    /// Value of an attribute on the card element itself
    fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Text content of the first descendant matching `selector`
    fn text_of(&self, selector: &str) -> Result<Option<String>>;
}

/// CSS selectors for a listing card and its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    pub container: String,
    pub title: String,
    pub price: String,
    pub attributes: String,
    pub description: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: "a.item-card_ItemCard--horizontal__zLpZu".to_string(),
            title: "h3.item-card_ItemCard__title__8eq2b".to_string(),
            price: "strong.item-card_ItemCard__price__pVpdc".to_string(),
            attributes: "div.item-card_ItemCard__attributes__Ks1zX".to_string(),
            description: "p.item-card_ItemCard__description__kCjwX".to_string(),
        }
    }
}

/// Card backed by an element of the rendered page HTML
pub struct HtmlListing<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlListing<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl ListingHandle for HtmlListing<'_> {
    fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.value().attr(name).map(str::to_string))
    }

    fn text_of(&self, selector: &str) -> Result<Option<String>> {
        let parsed = Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))?;

        Ok(self
            .element
            .select(&parsed)
            .next()
            .map(|node| node.text().collect::<String>()))
    }
}

/// Collect every listing card in document order
pub fn listing_handles<'a>(document: &'a Html, container: &str) -> Result<Vec<HtmlListing<'a>>> {
    let selector = Selector::parse(container)
        .map_err(|e| anyhow!("Invalid container selector '{}': {}", container, e))?;

    let handles: Vec<_> = document.select(&selector).map(HtmlListing::new).collect();
    info!("Found {} elements matching '{}'", handles.len(), container);

    Ok(handles)
}

/// Map each card to a record, one record per card and in the same order.
///
/// Lookup errors are logged and leave only the affected field empty.
pub fn extract<H: ListingHandle>(
    handles: &[H],
    selectors: &ListingSelectors,
    origin: &str,
) -> Vec<ListingRecord> {
    if handles.is_empty() {
        info!("No listing cards to extract");
        return Vec::new();
    }

    let mut records = Vec::with_capacity(handles.len());

    for (idx, handle) in handles.iter().enumerate() {
        let number = idx + 1;

        let url = field(number, "url", handle.attribute("href"))
            .map(|href| absolute_url(origin, &href));
        let title = field(number, "title", handle.text_of(&selectors.title));
        let price = field(number, "price", handle.text_of(&selectors.price))
            .map(|p| normalize_price(&p));
        let attributes_raw = field(number, "attributes", handle.text_of(&selectors.attributes));
        let description = field(number, "description", handle.text_of(&selectors.description));

        let [year, mileage, fuel, power] = attributes_raw
            .as_deref()
            .map(split_attributes)
            .unwrap_or_default();

        let record = ListingRecord {
            title,
            price,
            url,
            attributes_raw,
            year,
            mileage,
            fuel,
            power,
            description,
            scraped_at: Utc::now(),
        };

        debug!(
            "Listing {} extracted: '{}' ({})",
            number,
            ListingRecord::display(&record.title),
            ListingRecord::display(&record.url)
        );
        records.push(record);
    }

    info!("Extracted {} listings", records.len());
    records
}

fn field(number: usize, name: &str, lookup: Result<Option<String>>) -> Option<String> {
    match lookup {
        Ok(value) => value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
        Err(e) => {
            warn!("Could not read {} of listing {}: {:#}", name, number, e);
            None
        }
    }
}

/// Join a site-relative href onto the site origin
pub fn absolute_url(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

/// "25.000\u{a0}€" -> "25.000 €"
pub fn normalize_price(price: &str) -> String {
    price.replace("\u{a0}€", " €").trim().to_string()
}

/// Split "2018 · 45.000 km · Diésel · 120 cv" into year, mileage, fuel and power
pub fn split_attributes(raw: &str) -> [Option<String>; 4] {
    let mut parts = raw.split(ATTRIBUTE_SEPARATOR).map(|part| {
        let part = part.trim();
        (!part.is_empty()).then(|| part.to_string())
    });

    std::array::from_fn(|_| parts.next().flatten())
}
