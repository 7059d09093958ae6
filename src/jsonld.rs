//! JSON-LD output for a page: the page's own record as a linked-data graph, and the log of
//! entities its content mentions.
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

use crate::{
    config::SiteConfig,
    entity::{entity_url, DataRecord},
    error::LodError,
    markup::{Markup, ENTITY_LINK_SELECTOR},
};

pub const WEB_PAGE_TYPE: &str = "WebPage";

/// The page-level input of the graph builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Rendered markup, after annotation.
    #[serde(default)]
    pub content: String,
    /// The page's structured record. Values may be `{name, collection}` maps, or sequences
    /// containing them, that point at other entities.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Site-relative page URL, e.g. `/people/james-minahan/`.
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "@context", alias = "context")]
    pub context: String,
}

impl Page {
    /// Page model for a dataset record: `data` gains the record's `name` and, when the
    /// collection configures one, its `@type`.
    pub fn from_record(record: &DataRecord, config: &SiteConfig) -> Page {
        let mut data = record.data.clone();
        if let Some(kind) = config
            .collection(&record.collection)
            .and_then(|c| c.kind.as_deref())
        {
            data.insert("@type".to_string(), Value::from(kind));
        }
        data.insert("name".to_string(), Value::from(record.name.as_str()));
        Page {
            content: String::new(),
            data,
            url: config.page_path(&record.collection, &record.name),
            context: config.context.clone(),
        }
    }
}

/// `{"@id": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeId {
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonLdGraph {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@graph")]
    pub graph: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionsDocument {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub mentions: Vec<NodeId>,
}

/// Wrap serialized JSON-LD for embedding in a page. `</` is escaped so string values can't close
/// the script element early.
pub fn script_wrap(json: &str) -> String {
    format!(
        "<script type=\"application/ld+json\">{}</script>",
        json.replace("</", "<\\/")
    )
}

/// Builds linked-data documents with identifiers rooted at the configured site.
#[derive(Debug, Clone)]
pub struct GraphBuilder<'a> {
    config: &'a SiteConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> GraphBuilder<'a> {
        GraphBuilder { config }
    }

    /// `<site_url><base_url><page.url>`
    pub fn page_url(&self, page: &Page) -> String {
        format!("{}{}", self.config.origin(), page.url)
    }

    fn context_for(&self, page: &Page) -> String {
        if page.context.is_empty() {
            self.config.context.clone()
        } else {
            page.context.clone()
        }
    }

    /// `{"@id": url}` when `value` is a map holding both `name` and `collection`.
    fn resolve_pair(&self, value: &Value) -> Result<Option<Value>, LodError> {
        let Some(map) = value.as_object() else {
            return Ok(None);
        };
        let (Some(name), Some(collection)) = (map.get("name"), map.get("collection")) else {
            return Ok(None);
        };
        match (name.as_str(), collection.as_str()) {
            (Some(name), Some(collection)) => Ok(Some(json!({
                "@id": entity_url(
                    &self.config.site_url,
                    &self.config.base_url,
                    collection,
                    name
                )
            }))),
            _ => Err(LodError::Record(format!(
                "name/collection must be strings, found name={name} collection={collection}"
            ))),
        }
    }

    /// The page's record with nested entity pairs replaced by identifiers. The input page is
    /// left untouched.
    pub fn resolve_data(&self, page: &Page) -> Result<Map<String, Value>, LodError> {
        let mut data = page.data.clone();
        for (key, value) in data.iter_mut() {
            match value {
                Value::Object(_) => {
                    if let Some(resolved) = self.resolve_pair(value)? {
                        tracing::debug!("Resolved '{}' to {}", key, resolved);
                        *value = resolved;
                    }
                }
                Value::Array(items) => {
                    let mut converted = false;
                    let mut resolved_items = Vec::with_capacity(items.len());
                    for item in items.iter() {
                        match self.resolve_pair(item)? {
                            Some(resolved) => {
                                converted = true;
                                resolved_items.push(resolved);
                            }
                            None => resolved_items.push(item.clone()),
                        }
                    }
                    if converted {
                        *items = resolved_items;
                    }
                }
                _ => {}
            }
        }
        Ok(data)
    }

    pub fn page_graph(&self, page: &Page) -> Result<JsonLdGraph, LodError> {
        let page_url = self.page_url(page);
        let mut data = self.resolve_data(page)?;
        data.insert("@id".to_string(), Value::from(page_url.as_str()));
        let web_page = json!({
            "@id": format!("{page_url}index.html"),
            "@type": WEB_PAGE_TYPE,
            "mainEntity": { "@id": page_url },
        });
        Ok(JsonLdGraph {
            context: self.context_for(page),
            graph: vec![Value::Object(data), web_page],
        })
    }

    /// Absolute form of an entity link target. Targets that are already absolute are kept.
    fn absolute(&self, href: &str) -> String {
        if Url::parse(href).is_ok() {
            href.to_string()
        } else {
            format!("{}{}", self.config.site_url, href)
        }
    }

    /// Every entity link in the page content, in document order, duplicates kept.
    pub fn mentions(&self, page: &Page) -> Result<MentionsDocument, LodError> {
        let markup = Markup::parse(&page.content);
        let mut mentions = Vec::new();
        for link in markup.select(ENTITY_LINK_SELECTOR)? {
            match link.attributes.borrow().get("href") {
                Some(href) => mentions.push(NodeId {
                    id: self.absolute(href),
                }),
                None => tracing::debug!(
                    "Skipping entity link without href: '{}'",
                    link.as_node().text_contents()
                ),
            }
        }
        Ok(MentionsDocument {
            context: self.context_for(page),
            id: self.page_url(page),
            mentions,
        })
    }

    /// [GraphBuilder::page_graph], serialized and script wrapped.
    pub fn page_graph_script(&self, page: &Page) -> Result<String, LodError> {
        Ok(script_wrap(&serde_json::to_string(&self.page_graph(page)?)?))
    }

    /// [GraphBuilder::mentions], serialized and script wrapped.
    pub fn mentions_script(&self, page: &Page) -> Result<String, LodError> {
        Ok(script_wrap(&serde_json::to_string(&self.mentions(page)?)?))
    }
}
