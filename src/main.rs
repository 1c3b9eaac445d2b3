mod models;
mod scrapers;

use models::{ListingRecord, ScrapeOutcome};
use scrapers::{ScraperTrait, SearchParams, WallapopBrowserScraper};
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;

const SUMMARY_LIMIT: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚐 Wallapop Scout - browser scraper");

    let params = SearchParams::from_env()?;

    let span = info_span!(
        "scrape_run",
        search_term = %params.search_term,
        location = %params.location
    );
    let outcome = async {
        match WallapopBrowserScraper::new(params.clone()) {
            Ok(scraper) => {
                info!("Starting {} search", scraper.source_name());
                scraper.run().await
            }
            Err(e) => {
                error!("Could not start the browser: {:#}", e);
                ScrapeOutcome::Failed {
                    message: format!("{:#}", e),
                }
            }
        }
    }
    .instrument(span)
    .await;

    if outcome.is_failure() {
        warn!("Run produced no usable results");
    } else {
        info!("Run produced {} listings", outcome.listings().len());
    }

    if params.json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&params, &outcome);
    }

    info!("Scraper finished");
    Ok(())
}

fn print_summary(params: &SearchParams, outcome: &ScrapeOutcome) {
    match outcome {
        ScrapeOutcome::Listings { listings } if !listings.is_empty() => {
            println!(
                "\n--- Results for '{}' in {} ---",
                params.search_term, params.location
            );
            println!("Total listings found: {}", listings.len());
            println!("\nFirst {}:", SUMMARY_LIMIT.min(listings.len()));

            for (i, listing) in listings.iter().take(SUMMARY_LIMIT).enumerate() {
                println!(
                    "{}. {} ({})",
                    i + 1,
                    ListingRecord::display(&listing.title),
                    ListingRecord::display(&listing.price)
                );
                println!(
                    "   {} · {} · {} · {}",
                    ListingRecord::display(&listing.year),
                    ListingRecord::display(&listing.mileage),
                    ListingRecord::display(&listing.fuel),
                    ListingRecord::display(&listing.power)
                );
                println!("   URL: {}", ListingRecord::display(&listing.url));
            }

            if listings.len() > SUMMARY_LIMIT {
                println!("  ...and {} more.", listings.len() - SUMMARY_LIMIT);
            }
        }
        ScrapeOutcome::Listings { .. } => {
            println!("\n--- No listings found for '{}' ---", params.search_term);
        }
        ScrapeOutcome::Failed { message } => {
            println!("\n--- Could not get results for '{}' ---", params.search_term);
            println!("Error: {}", message);
        }
    }
}
