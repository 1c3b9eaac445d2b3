use crate::models::ListingRecord;
use crate::scrapers::extract::{extract, listing_handles, ListingSelectors};
use crate::scrapers::locators;
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::SearchParams;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::Html;
use std::thread;
use std::time::Duration;
use tracing::{info, warn, Span};

const SEARCH_BOX: &str = "#searchbox-form-input";
const CATEGORY_MENU: &str = "All Categories";

/// Browser-based scraper for Wallapop search results using headless Chrome
#[derive(Clone)]
pub struct WallapopBrowserScraper {
    browser: Browser,
    params: SearchParams,
    selectors: ListingSelectors,
}

impl WallapopBrowserScraper {
    /// Launch Chrome for the given search
    pub fn new(params: SearchParams) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", params.headless);

        let options = LaunchOptions::default_builder()
            .headless(params.headless)
            .window_size(Some((1920, 1080)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        info!("Scraper ready for {}", params.base_url);

        Ok(Self {
            browser,
            params,
            selectors: ListingSelectors::default(),
        })
    }

    /// Run the whole search flow in a fresh tab and extract the first results page.
    ///
    /// The tab is closed whether or not the flow succeeds.
    pub fn scrape_listings(&self) -> Result<Vec<ListingRecord>> {
        let tab = self
            .browser
            .new_tab()
            .context("Failed to open a browser tab")?;

        let result = self.search_and_extract(&tab);

        match tab.close(true) {
            Ok(_) => info!("Browser tab closed"),
            Err(e) => warn!("Failed to close browser tab: {:#}", e),
        }

        result
    }

    fn search_and_extract(&self, tab: &Tab) -> Result<Vec<ListingRecord>> {
        let params = &self.params;
        let waits = &params.waits;

        info!("Navigating to {}", params.base_url);
        tab.navigate_to(&params.base_url)
            .with_context(|| format!("Failed to navigate to {}", params.base_url))?;
        tab.wait_until_navigated()
            .with_context(|| format!("Navigation to {} did not finish", params.base_url))?;
        info!("Page loaded: {}", tab.get_url());
        thread::sleep(waits.short_pause);

        info!("Accepting cookies...");
        self.click(tab, &locators::button_named("Aceptar todo"), "cookie banner 'Aceptar todo'")?;
        thread::sleep(waits.short_pause);

        info!("Opening 'Todas las categorías'");
        self.click(tab, &locators::button_named("Todas las categorías"), "category menu")?;
        thread::sleep(waits.short_pause);

        info!("Selecting category '{}'", params.category);
        self.click(
            tab,
            &locators::labelled_within_navigation(CATEGORY_MENU, &params.category),
            &format!("category '{}'", params.category),
        )?;
        thread::sleep(waits.settle_pause);

        info!("Searching for '{}'", params.search_term);
        let search_box = tab
            .wait_for_element_with_custom_timeout(SEARCH_BOX, waits.element_timeout)
            .context("Search box did not appear")?;
        search_box.click().context("Failed to focus the search box")?;
        search_box
            .type_into(&params.search_term)
            .context("Failed to type the search term")?;
        tab.press_key("Enter").context("Failed to submit the search")?;
        thread::sleep(waits.settle_pause);

        info!("Changing location");
        self.click_within(
            tab,
            &locators::button_named("Cambiar"),
            "location button 'Cambiar'",
            waits.element_timeout,
        )?;
        thread::sleep(waits.short_pause);

        info!("Setting location to '{}'", params.location);
        let location_box = tab
            .wait_for_xpath_with_custom_timeout(
                &locators::searchbox_named("¿Dónde?"),
                waits.location_box_timeout,
            )
            .context("Location search box '¿Dónde?' did not appear")?;
        location_box.click().context("Failed to focus the location box")?;
        location_box
            .type_into(&params.location)
            .context("Failed to type the location")?;

        self.click_within(
            tab,
            &locators::exact_text(&params.location),
            &format!("location suggestion '{}'", params.location),
            waits.element_timeout,
        )?;
        thread::sleep(waits.short_pause);

        info!("Applying location filter");
        self.click(tab, &locators::button_named("Aplicar"), "button 'Aplicar'")?;
        thread::sleep(waits.short_pause);

        self.extract_listings(tab)
    }

    fn extract_listings(&self, tab: &Tab) -> Result<Vec<ListingRecord>> {
        info!("Extracting listings from the results page...");

        if let Err(e) = tab.wait_for_element_with_custom_timeout(
            &self.selectors.container,
            self.params.waits.listings_timeout,
        ) {
            warn!(
                "No listings matching '{}' after {:?}, the result list may be empty: {:#}",
                self.selectors.container, self.params.waits.listings_timeout, e
            );
            return Ok(Vec::new());
        }

        let html_result = tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to read page HTML")?;
        let html_str = match html_result.value {
            Some(value) => value.as_str().unwrap_or("").to_string(),
            None => String::new(),
        };

        if html_str.is_empty() {
            warn!("Page HTML is empty");
            return Ok(Vec::new());
        }

        let document = Html::parse_document(&html_str);
        let handles = listing_handles(&document, &self.selectors.container)?;

        Ok(extract(&handles, &self.selectors, self.params.origin()))
    }

    fn click(&self, tab: &Tab, xpath: &str, what: &str) -> Result<()> {
        self.click_within(tab, xpath, what, self.params.waits.element_timeout)
    }

    fn click_within(&self, tab: &Tab, xpath: &str, what: &str, timeout: Duration) -> Result<()> {
        tab.wait_for_xpath_with_custom_timeout(xpath, timeout)
            .with_context(|| format!("Timed out waiting for {}", what))?
            .click()
            .with_context(|| format!("Failed to click {}", what))?;
        Ok(())
    }
}

#[async_trait]
impl ScraperTrait for WallapopBrowserScraper {
    async fn scrape(&self) -> Result<Vec<ListingRecord>> {
        let scraper = self.clone();
        run_blocking(move || scraper.scrape_listings()).await
    }

    fn source_name(&self) -> &'static str {
        "Wallapop"
    }
}

/// Run a blocking browser job on the blocking pool inside the current span.
///
/// A panicking job comes back as an error.
async fn run_blocking<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let span = Span::current();

    tokio::task::spawn_blocking(move || span.in_scope(job))
        .await
        .context("Browser task did not complete")?
}
