//! Parser module for extracting anime metadata from markup fragments
//!
//! Each card on a listing page carries its detail markup in an attribute.
//! The extractors here each pull one field out of such a fragment; the
//! assembler runs all of them against the same fragment to build a record.
//!
//! Title, type and description are always present on the target site, so
//! their absence is an error. Every other field is optional and degrades to
//! an empty string or empty list.

pub mod listing;

use thiserror::Error;

use crate::compose::{default, from_spec, map_with, Spec};
use crate::markup::{find_all_by, find_by, text_of, text_or_empty, Document, Query};
use crate::models::{AnimeRecord, FieldValue};
use crate::pipe;

pub use listing::{
    find_card_deck, find_pager, get_range, list_fragments, pager_range, ListingError,
};

/// A field the fragment must always carry was missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("required field `{field}` has no element matching {query}")]
    MissingNode { field: &'static str, query: String },

    #[error("required field `{field}` matched {query} but it has no text")]
    MissingText { field: &'static str, query: String },
}

fn required_text(field: &'static str, query: Query, doc: &Document) -> Result<String, ExtractError> {
    let node = find_by(&query, doc.root()).ok_or_else(|| ExtractError::MissingNode {
        field,
        query: query.to_string(),
    })?;

    text_of(node).ok_or_else(|| ExtractError::MissingText {
        field,
        query: query.to_string(),
    })
}

fn optional_text(query: Query, doc: &Document) -> String {
    text_or_empty(find_by(&query, doc.root()))
}

pub fn anime_title(doc: &Document) -> Result<String, ExtractError> {
    required_text("title", Query::tag("h5"), doc)
}

pub fn anime_title_alt(doc: &Document) -> String {
    optional_text(Query::class("h6", "aka"), doc)
}

pub fn anime_type(doc: &Document) -> Result<String, ExtractError> {
    required_text("type", Query::class("li", "type"), doc)
}

/// The studio is the first list item without a class.
pub fn anime_studio(doc: &Document) -> String {
    optional_text(Query::class("li", ""), doc)
}

pub fn anime_year(doc: &Document) -> String {
    optional_text(Query::class("li", "iconYear"), doc)
}

pub fn anime_rating(doc: &Document) -> String {
    optional_text(Query::class("div", "ttRating"), doc)
}

pub fn anime_description(doc: &Document) -> Result<String, ExtractError> {
    required_text("description", Query::tag("p"), doc)
}

/// Text of every list item inside `div.tags`, in order. No container means
/// no tags; an item without text contributes `""`.
pub fn anime_tags(doc: &Document) -> Vec<String> {
    let item = Query::tag("li");
    let tag_text = pipe!(text_of, default(String::new()));

    find_by(&Query::class("div", "tags"), doc.root())
        .map(|container| map_with(&tag_text)(find_all_by(&item, container)).collect())
        .unwrap_or_default()
}

fn required(
    f: fn(&Document) -> Result<String, ExtractError>,
) -> impl Fn(&Document) -> Result<FieldValue, ExtractError> {
    move |doc: &Document| f(doc).map(FieldValue::Text)
}

fn optional<V: Into<FieldValue>>(
    f: fn(&Document) -> V,
) -> impl Fn(&Document) -> Result<FieldValue, ExtractError> {
    move |doc: &Document| Ok(f(doc).into())
}

/// Field name to extractor, in output order.
pub fn metadata_spec() -> Spec<Document, FieldValue, ExtractError> {
    Spec::new()
        .field("title", required(anime_title))
        .field("altTitle", optional(anime_title_alt))
        .field("type", required(anime_type))
        .field("studio", optional(anime_studio))
        .field("year", optional(anime_year))
        .field("rating", optional(anime_rating))
        .field("description", required(anime_description))
        .field("tags", optional(anime_tags))
}

/// Build the record for one parsed fragment.
///
/// # Arguments
/// * `doc` - A parsed detail fragment
///
/// # Returns
/// The record with every key of [`RECORD_KEYS`](crate::models::RECORD_KEYS),
/// or the first structural absence encountered.
pub fn assemble(doc: &Document) -> Result<AnimeRecord, ExtractError> {
    from_spec(metadata_spec())(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_html;
    use crate::models::{AnimeMetadata, RECORD_KEYS};

    const FULL_FRAGMENT: &str = r#"
        <div>
          <h5>Awesome anime</h5>
          <h6 class="aka">Alt title: Osomu anime</h6>
          <ul class="entryBar">
            <li class="type">TV (12ep)</li>
            <li>Production I.G.</li>
            <li class="iconYear">2010 - 2011</li>
            <li><div class="ttRating">3.4</div></li>
          </ul>
          <p>Wonderful story about anime.</p>
          <div class="tags">
            <h4>Tags</h4>
            <ul>
              <li>food</li>
              <li>drinks</li>
              <li>fun</li>
            </ul>
          </div>
        </div>
    "#;

    #[test]
    fn test_anime_title() {
        let doc = parse_html("<div><h5>Title</h5></div>");
        assert_eq!(anime_title(&doc).unwrap(), "Title");
    }

    #[test]
    fn test_anime_title_missing_is_error() {
        let doc = parse_html("<div><h6 class=\"aka\">Only alt</h6></div>");
        assert_eq!(
            anime_title(&doc),
            Err(ExtractError::MissingNode {
                field: "title",
                query: "h5".to_string()
            })
        );
    }

    #[test]
    fn test_anime_title_without_text_is_error() {
        let doc = parse_html("<div><h5></h5></div>");
        assert!(matches!(
            anime_title(&doc),
            Err(ExtractError::MissingText { field: "title", .. })
        ));
    }

    #[test]
    fn test_anime_title_alt() {
        let doc = parse_html("<div><h6 class=\"aka\">Alternative title</h6></div>");
        assert_eq!(anime_title_alt(&doc), "Alternative title");

        let doc = parse_html("<div></div>");
        assert_eq!(anime_title_alt(&doc), "");
    }

    #[test]
    fn test_anime_type() {
        let doc = parse_html("<div><li class=\"type\">TV (12ep)</li></div>");
        assert_eq!(anime_type(&doc).unwrap(), "TV (12ep)");

        let doc = parse_html("<div><li>Production I.G.</li></div>");
        assert!(matches!(
            anime_type(&doc),
            Err(ExtractError::MissingNode { field: "type", .. })
        ));
    }

    #[test]
    fn test_anime_studio() {
        let doc = parse_html(
            r#"
            <ul>
              <li class="type">TV (12ep)</li>
              <li>Production I.G.</li>
              <li>Bogus</li>
            </ul>
            "#,
        );
        assert_eq!(anime_studio(&doc), "Production I.G.");

        // First unclassed item is empty: no fallthrough to the next one.
        let doc = parse_html(
            r#"
              <li class="type">TV (12ep)</li>
              <li></li>
              <li>Bogus</li>
            </ul>
            "#,
        );
        assert_eq!(anime_studio(&doc), "");

        let doc = parse_html(r#"<ul><li class="type">TV</li></ul>"#);
        assert_eq!(anime_studio(&doc), "");
    }

    #[test]
    fn test_anime_year() {
        let doc = parse_html(r#"<ul><li class="iconYear">2010 - 2011</li></ul>"#);
        assert_eq!(anime_year(&doc), "2010 - 2011");

        let doc = parse_html(r#"<ul><li class="iconYear"></li></ul>"#);
        assert_eq!(anime_year(&doc), "");
    }

    #[test]
    fn test_anime_rating() {
        let doc = parse_html(r#"<ul><li><div class="ttRating">3.4</div></li></ul>"#);
        assert_eq!(anime_rating(&doc), "3.4");

        let doc = parse_html("<ul><li></li></ul>");
        assert_eq!(anime_rating(&doc), "");
    }

    #[test]
    fn test_anime_description() {
        let doc = parse_html("<div><p>Awesome description</p></div>");
        assert_eq!(anime_description(&doc).unwrap(), "Awesome description");

        let doc = parse_html("<div><h5>No description</h5></div>");
        assert!(matches!(
            anime_description(&doc),
            Err(ExtractError::MissingNode { field: "description", .. })
        ));
    }

    #[test]
    fn test_anime_tags() {
        let doc = parse_html(
            r#"
            <div>
              <div class="tags">
                <h4>Tags</h4>
                <ul>
                  <li>food</li>
                  <li>drinks</li>
                  <li>fun</li>
                </ul>
              </div>
            </div>
            "#,
        );
        assert_eq!(anime_tags(&doc), vec!["food", "drinks", "fun"]);

        let doc = parse_html("<div></div>");
        assert!(anime_tags(&doc).is_empty());
    }

    #[test]
    fn test_anime_tags_ignores_items_outside_container() {
        let doc = parse_html(
            r#"
            <ul><li>Production I.G.</li></ul>
            <div class="tags"><ul><li>mecha</li><li></li></ul></div>
            "#,
        );
        assert_eq!(anime_tags(&doc), vec!["mecha", ""]);
    }

    #[test]
    fn test_assemble_full_fragment() {
        let doc = parse_html(FULL_FRAGMENT);
        let record = assemble(&doc).unwrap();

        assert_eq!(record.keys().collect::<Vec<_>>(), RECORD_KEYS.to_vec());

        let text = |key: &str| record.get(key).and_then(FieldValue::as_text).unwrap();
        assert_eq!(text("title"), "Awesome anime");
        assert_eq!(text("altTitle"), "Alt title: Osomu anime");
        assert_eq!(text("type"), "TV (12ep)");
        assert_eq!(text("studio"), "Production I.G.");
        assert_eq!(text("year"), "2010 - 2011");
        assert_eq!(text("rating"), "3.4");
        assert_eq!(text("description"), "Wonderful story about anime.");
        assert_eq!(
            record.get("tags").and_then(FieldValue::as_list).unwrap(),
            &["food".to_string(), "drinks".to_string(), "fun".to_string()][..]
        );
    }

    #[test]
    fn test_assemble_serializes_exact_record() {
        let record = assemble(&parse_html(FULL_FRAGMENT)).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"title":"Awesome anime","altTitle":"Alt title: Osomu anime","#,
                r#""type":"TV (12ep)","studio":"Production I.G.","year":"2010 - 2011","#,
                r#""rating":"3.4","description":"Wonderful story about anime.","#,
                r#""tags":["food","drinks","fun"]}"#
            )
        );
    }

    #[test]
    fn test_assemble_degrades_optional_fields() {
        let doc = parse_html(
            r#"
            <h5>Bare anime</h5>
            <ul class="entryBar"><li class="type">Movie (1ep)</li></ul>
            <p>Only the essentials.</p>
            "#,
        );
        let metadata = AnimeMetadata::from(&assemble(&doc).unwrap());

        assert_eq!(
            metadata,
            AnimeMetadata {
                title: "Bare anime".to_string(),
                anime_type: "Movie (1ep)".to_string(),
                description: "Only the essentials.".to_string(),
                ..AnimeMetadata::default()
            }
        );
    }

    #[test]
    fn test_assemble_fails_on_structural_absence() {
        let doc = parse_html(
            r#"
            <h5>No type here</h5>
            <p>Description.</p>
            "#,
        );
        assert!(matches!(
            assemble(&doc),
            Err(ExtractError::MissingNode { field: "type", .. })
        ));
    }

    #[test]
    fn test_metadata_spec_keys() {
        assert_eq!(metadata_spec().keys(), RECORD_KEYS.to_vec());
    }
}
