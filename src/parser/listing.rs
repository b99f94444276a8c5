//! Listing page parsing: the pager and the card deck.

use std::num::ParseIntError;
use std::ops::RangeInclusive;

use scraper::ElementRef;
use thiserror::Error;

use crate::compose::{filter_by, map_with};
use crate::constants::selectors;
use crate::markup::{find_by, find_links, has_text_content, parse_html, text_of, Document, Query};

/// Errors raised while reading a listing page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing page has no pager")]
    MissingPager,

    #[error("pager contains no numbered links")]
    NoPageNumbers,

    #[error("pager link {text:?} is not a page number: {source}")]
    InvalidPageNumber {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("listing page has no card deck")]
    MissingCardDeck,

    #[error("card link #{index} carries no detail fragment")]
    MissingFragment { index: usize },
}

/// `1..=last`
pub fn get_range(last: u32) -> RangeInclusive<u32> {
    1..=last
}

pub fn find_pager(doc: &Document) -> Option<ElementRef<'_>> {
    find_by(
        &Query::class(selectors::PAGER_TAG, selectors::PAGER_CLASS),
        doc.root(),
    )
}

pub fn find_card_deck(doc: &Document) -> Option<ElementRef<'_>> {
    find_by(
        &Query::attrs(
            selectors::CARD_DECK_TAG,
            [
                ("class", selectors::CARD_DECK_CLASS),
                ("data-type", selectors::CARD_DECK_TYPE),
            ],
        ),
        doc.root(),
    )
}

fn page_number(link: ElementRef<'_>) -> Result<u32, ListingError> {
    let text = text_of(link).unwrap_or_default();
    text.trim()
        .parse()
        .map_err(|source| ListingError::InvalidPageNumber { text, source })
}

/// Page range advertised by the listing's pager.
///
/// Links without text are navigation controls and are skipped. Every other
/// link must hold a page number; the highest one is the last page.
pub fn pager_range(doc: &Document) -> Result<RangeInclusive<u32>, ListingError> {
    let pager = find_pager(doc).ok_or(ListingError::MissingPager)?;
    let numbered = filter_by(has_text_content)(find_links(pager));

    let last = map_with(page_number)(numbered)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .max()
        .filter(|last| *last >= 1)
        .ok_or(ListingError::NoPageNumbers)?;

    Ok(get_range(last))
}

/// Parse the detail fragment embedded in each card link's `title`
/// attribute, in card order.
pub fn list_fragments(doc: &Document) -> Result<Vec<Document>, ListingError> {
    let deck = find_card_deck(doc).ok_or(ListingError::MissingCardDeck)?;

    find_links(deck)
        .into_iter()
        .enumerate()
        .map(|(index, link)| {
            link.value()
                .attr(selectors::FRAGMENT_ATTR)
                .map(parse_html)
                .ok_or(ListingError::MissingFragment { index })
        })
        .collect()
}
