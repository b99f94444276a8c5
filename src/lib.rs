//! Anime Harvester Library
//!
//! This library walks the paginated anime listing on anime-planet, parses the
//! detail fragment embedded in every card and turns it into an ordered
//! metadata record.

pub mod compose;
pub mod config;
pub mod constants;
pub mod crawler;
pub mod error;
pub mod markup;
pub mod models;
pub mod parser;
pub mod scraper;
pub mod sink;
