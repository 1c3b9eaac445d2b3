pub mod browser;
pub mod extract;
pub mod locators;
pub mod traits;
pub mod types;

pub use browser::WallapopBrowserScraper;
pub use traits::ScraperTrait;
pub use types::SearchParams;
