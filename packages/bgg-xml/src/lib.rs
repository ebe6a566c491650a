//! bgg-xml - Map BoardGameGeek XML API responses onto typed records.
//!
//! Record types declare, per field, how its value is found in an XML
//! element: an attribute, element text, a single child, all matching
//! children, or an automatic guess based on the element's shape. The
//! mapping engine runs those declarations against a parsed document and
//! hands the raw values to the record for coercion and validation.
//!
//! # Example
//!
//! ```
//! use bgg_xml::models::parse_things;
//!
//! let xml = r#"<items>
//!   <item type="boardgame" id="174430">
//!     <name type="primary" sortindex="1" value="Gloomhaven"/>
//!     <yearpublished value="2017"/>
//!   </item>
//! </items>"#;
//!
//! let games = parse_things(xml).unwrap();
//! assert_eq!(games[0].primary_name(), "Gloomhaven");
//! assert_eq!(games[0].year_published, Some(2017));
//! ```
//!
//! # Architecture
//!
//! - [`mapping`]: Field descriptors, strategy dispatch and record building
//! - [`models`]: BGG record types (games, statistics, search results)
//! - [`xml`]: XML utilities
//! - [`config`]: Configuration constants, settings and validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP download with retry
//! - [`cache`]: On-disk response cache
//! - [`client`]: BGG API client
//! - [`cli`]: Command-line interface

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapping;
pub mod models;
pub mod xml;

pub use cache::ResponseCache;
pub use client::BggClient;
pub use config::{validate_thing_id, Settings};
pub use error::{BggError, ConstructionError, FieldError, FieldErrorKind, Result};
pub use mapping::{FieldDescriptor, LookupStrategy, MissingField, Schema, XmlRecord};
pub use models::{parse_search, parse_things, Game, SearchResponse};
