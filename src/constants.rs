//! Constants module for the harvester
//!
//! Contains the listing URL builders and the markup selectors of the target
//! site.

/// URL builder functions for the listing pages
pub mod endpoints {
    use url::Url;

    /// Default listing page
    pub const BASE_URL: &str = "https://www.anime-planet.com/anime/all";

    /// Listing sort key and direction
    pub const SORT: &str = "title";
    pub const ORDER: &str = "asc";

    /// Name of the page number query parameter
    pub const PAGE_PARAM: &str = "page";

    /// Listing page URL for a page number, sorted by title ascending
    pub fn page_url(base_url: &str, page: u32) -> String {
        format!(
            "{}?sort={}&order={}&{}={}",
            base_url,
            urlencoding::encode(SORT),
            urlencoding::encode(ORDER),
            PAGE_PARAM,
            page
        )
    }

    /// Page number carried by a listing page URL
    pub fn page_number(url: &str) -> Option<u32> {
        Url::parse(url)
            .ok()?
            .query_pairs()
            .find(|(key, _)| key == PAGE_PARAM)
            .and_then(|(_, value)| value.parse().ok())
    }
}

/// Markup conventions of the listing pages
pub mod selectors {
    /// Pager container
    pub const PAGER_TAG: &str = "div";
    pub const PAGER_CLASS: &str = "pagination aligncenter";

    /// Container of the item cards
    pub const CARD_DECK_TAG: &str = "ul";
    pub const CARD_DECK_CLASS: &str = "cardDeck";
    pub const CARD_DECK_TYPE: &str = "anime";

    /// Card link attribute holding the detail fragment markup
    pub const FRAGMENT_ATTR: &str = "title";
}
