//! # lod-core
//!
//! Entity mention linking and JSON-LD generation for static-site pipelines.
//!
//! ## Overview
//!
//! A site's dataset names people, places and organisations, each belonging to a *collection*
//! that gives it a URL namespace (`/people/james-minahan/`). lod-core takes already-rendered page
//! content and:
//!
//! - numbers paragraphs and blockquotes (`para-<i>`, `quote-<i>`) so client code can address them;
//! - finds mentions of known entity names in paragraph text and turns them into RDFa anchors;
//! - reports which entities each paragraph references;
//! - emits JSON-LD for a page's own record and for the entities its content mentions.
//!
//! ## Architecture
//!
//! - **[`slug`]**: the text → URL segment transform every URL goes through
//! - **[`entity`]**: `Entity`, the immutable `EntityIndex` (name → collection), URL building
//! - **[`markup`]**: the HTML passes (`assign_ids`, `MentionAnnotator`, `paragraph_references`)
//! - **[`jsonld`]**: `Page` and the `GraphBuilder` for page graphs and mention logs
//! - **[`filters`]**: `Filters`, the template-facing call sites bound to one config and index
//! - **[`config`]**: `SiteConfig`, loaded from TOML, YAML (Jekyll `_config.yml`) or JSON
//!
//! The index is built once per site build and shared read-only by every page; configuration is
//! passed explicitly, never read from global state.
//!
//! ## Quick Start
//!
//! ```rust
//! use lod_core::{Entity, EntityIndex, Filters, Page, SiteConfig};
//!
//! # fn main() -> Result<(), lod_core::LodError> {
//! let config = SiteConfig::new("https://example.org", "/ed")?;
//! let index = EntityIndex::build(vec![
//!     Entity::new("James Minahan", "people"),
//!     Entity::new("Hobart", "places"),
//! ]);
//! let filters = Filters::new(&config, &index)?;
//!
//! let content = filters.annotate_and_assign_ids("<p>James Minahan left Hobart.</p>")?;
//! let references = filters.paragraph_references(&content)?;
//! assert!(references.starts_with("{\"para-0\":"));
//!
//! let page = Page { content, url: "/essays/departure/".to_string(), ..Default::default() };
//! let mentions = filters.mentions_graph(&page)?;
//! assert!(mentions.contains("https://example.org/ed/places/hobart/"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Ambiguous names
//!
//! A name maps to exactly one collection. When the dataset declares the same name in two
//! collections, [`ConflictPolicy::KeepFirst`] keeps the first record in dataset order and logs a
//! warning; [`ConflictPolicy::Reject`] fails the index build instead.

pub mod config;
pub mod entity;
pub mod error;
pub mod filters;
pub mod jsonld;
pub mod markup;
pub mod slug;
#[cfg(test)]
mod tests;

pub use config::{CollectionConfig, SiteConfig};
pub use entity::{
    entity_url, load_records, url_for, ConflictPolicy, DataRecord, Entity, EntityIndex, Reference,
};
pub use error::*;
pub use filters::Filters;
pub use jsonld::{GraphBuilder, JsonLdGraph, MentionsDocument, NodeId, Page};
pub use markup::{Markup, MentionAnnotator, ParagraphReferences};
pub use slug::slugify;
