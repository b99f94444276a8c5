//! Pagination and crawl driver
//!
//! Fetches the base listing page once to learn how many pages there are,
//! then walks pages 1..=N in order, turning every card on a page into a
//! record. The whole crawl is a lazy stream: nothing is fetched until it is
//! polled, and the first error ends it.

use std::ops::RangeInclusive;

use async_stream::try_stream;
use futures::Stream;
use tracing::{debug, info};

use crate::constants::endpoints;
use crate::error::AppResult;
use crate::markup::{parse_html, Document};
use crate::models::{record_title, AnimeRecord};
use crate::parser::{assemble, list_fragments, pager_range};
use crate::scraper::{Fetch, ScraperError};

/// Crawl driver over any [`Fetch`] implementation
pub struct Crawler<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// URL of listing page `page`
    pub fn page_url(&self, page: u32) -> String {
        endpoints::page_url(&self.base_url, page)
    }

    /// Fetch a page and parse it.
    pub async fn fetch_and_parse(&self, url: &str) -> Result<Document, ScraperError> {
        let html = self.fetcher.fetch(url).await?;
        Ok(parse_html(&html))
    }

    /// Page range advertised by the base listing page
    pub async fn page_count(&self) -> AppResult<RangeInclusive<u32>> {
        let listing = self.fetch_and_parse(&self.base_url).await?;
        Ok(pager_range(&listing)?)
    }

    /// All records on one listing page, in card order.
    pub async fn download_page(&self, page: u32) -> AppResult<Vec<AnimeRecord>> {
        let url = self.page_url(page);
        let listing = self.fetch_and_parse(&url).await?;

        let records = list_fragments(&listing)?
            .iter()
            .map(assemble)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(page, count = records.len(), "Extracted records");
        Ok(records)
    }

    /// Every record of every page: page order first, then card order
    /// within the page.
    pub fn run(&self) -> impl Stream<Item = AppResult<AnimeRecord>> + '_ {
        try_stream! {
            let pages = self.page_count().await?;
            info!(base_url = %self.base_url, pages = *pages.end(), "Starting crawl");

            for page in pages {
                info!(page, "Downloading page");
                for record in self.download_page(page).await? {
                    debug!(title = record_title(&record), "Harvested");
                    yield record;
                }
            }
        }
    }

    /// Drive [`run`](Self::run) to completion and collect everything.
    pub async fn collect_all(&self) -> AppResult<Vec<AnimeRecord>> {
        use futures::TryStreamExt;

        self.run().try_collect().await
    }
}
