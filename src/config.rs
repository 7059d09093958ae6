use crate::{entity::ConflictPolicy, error::LodError, slug::slugify};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs::read_to_string, path::Path};
use url::Url;

pub const DEFAULT_CONTEXT: &str = "http://schema.org/";

/// Per-collection rendering settings (Jekyll's `data_types`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Output directory for record pages. Defaults to the collection name.
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    /// JSON-LD `@type` assigned to records of this collection.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Site-wide settings threaded explicitly into every component that builds URLs.
///
/// Missing `site_url`/`base_url` are treated as empty strings, which yields root-relative URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default, alias = "url")]
    pub site_url: String,
    #[serde(default, alias = "baseurl")]
    pub base_url: String,
    #[serde(default = "default_context")]
    pub context: String,
    #[serde(default, alias = "page_gen-dirs")]
    pub page_gen_dirs: bool,
    #[serde(default, alias = "data_types")]
    pub collections: BTreeMap<String, CollectionConfig>,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site_url: String::new(),
            base_url: String::new(),
            context: default_context(),
            page_gen_dirs: false,
            collections: BTreeMap::new(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl SiteConfig {
    pub fn new(site_url: &str, base_url: &str) -> Result<Self, LodError> {
        SiteConfig {
            site_url: site_url.to_string(),
            base_url: base_url.to_string(),
            ..Default::default()
        }
        .normalized()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LodError> {
        toml::from_str::<SiteConfig>(content)?.normalized()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, LodError> {
        // An empty YAML document deserializes to unit, not a map.
        if content.trim().is_empty() {
            return Ok(SiteConfig::default());
        }
        serde_yaml::from_str::<SiteConfig>(content)?.normalized()
    }

    pub fn from_json_str(content: &str) -> Result<Self, LodError> {
        serde_json::from_str::<SiteConfig>(content)?.normalized()
    }

    /// Load a config file, choosing the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LodError> {
        let path = path.as_ref();
        tracing::debug!("Reading site config from {:?}", path);
        let content = read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => SiteConfig::from_toml_str(&content),
            Some("yml") | Some("yaml") => SiteConfig::from_yaml_str(&content),
            Some("json") => SiteConfig::from_json_str(&content),
            other => Err(LodError::Config(format!(
                "Unsupported config format {other:?} for {path:?}"
            ))),
        }
    }

    /// Trim trailing separators and check that `site_url` is an absolute URL.
    pub fn normalized(mut self) -> Result<Self, LodError> {
        self.site_url = self.site_url.trim().trim_end_matches('/').to_string();
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !self.site_url.is_empty() {
            let parsed = Url::parse(&self.site_url)?;
            if parsed.cannot_be_a_base() {
                return Err(LodError::Config(format!(
                    "site_url '{}' is not a base URL",
                    self.site_url
                )));
            }
        }
        if !self.base_url.is_empty() && !self.base_url.starts_with('/') {
            self.base_url = format!("/{}", self.base_url);
        }
        if self.context.is_empty() {
            self.context = default_context();
        }
        Ok(self)
    }

    /// `<site_url><base_url>`, the prefix of every absolute identifier.
    pub fn origin(&self) -> String {
        format!("{}{}", self.site_url, self.base_url)
    }

    pub fn collection(&self, collection: &str) -> Option<&CollectionConfig> {
        self.collections.get(collection)
    }

    /// Output directory for pages of `collection`.
    pub fn collection_dir<'a>(&'a self, collection: &'a str) -> &'a str {
        self.collection(collection)
            .and_then(|c| c.dir.as_deref())
            .unwrap_or(collection)
    }

    /// Site-relative path of the generated page for a record.
    pub fn page_path(&self, collection: &str, name: &str) -> String {
        let dir = self.collection_dir(collection);
        if self.page_gen_dirs {
            format!("/{}/{}/", dir, slugify(name))
        } else {
            format!("/{}/{}.html", dir, slugify(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jekyll_yaml_config() {
        let yaml = r#"
url: "https://example.org/"
baseurl: "/ed/"
page_gen-dirs: true
data_types:
  people:
    dir: people
    template: person
    type: Person
  places:
    template: place
    type: Place
"#;
        let config = SiteConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.site_url, "https://example.org");
        assert_eq!(config.base_url, "/ed");
        assert_eq!(config.origin(), "https://example.org/ed");
        assert_eq!(config.context, DEFAULT_CONTEXT);
        assert!(config.page_gen_dirs);
        assert_eq!(
            config.collection("people").and_then(|c| c.kind.as_deref()),
            Some("Person")
        );
        assert_eq!(config.collection_dir("places"), "places");
        assert_eq!(config.conflict_policy, ConflictPolicy::KeepFirst);
    }

    #[test]
    fn test_toml_config() {
        let toml = r#"
site_url = "https://example.org"
base_url = "ed"
context = "https://schema.org/"
conflict_policy = "reject"

[collections.organisations]
dir = "orgs"
type = "Organization"
"#;
        let config = SiteConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.base_url, "/ed");
        assert_eq!(config.context, "https://schema.org/");
        assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
        assert_eq!(config.collection_dir("organisations"), "orgs");
    }

    #[test]
    fn test_missing_urls_are_empty() {
        let config = SiteConfig::from_yaml_str("").unwrap();
        assert_eq!(config.origin(), "");
        let config = SiteConfig::from_toml_str("page_gen_dirs = false").unwrap();
        assert_eq!(config.origin(), "");
    }

    #[test]
    fn test_invalid_site_url() {
        let err = SiteConfig::new("not a url", "").unwrap_err();
        assert!(matches!(err, LodError::Config(_)));
    }

    #[test]
    fn test_page_path() {
        let mut config = SiteConfig::new("", "/ed").unwrap();
        assert_eq!(
            config.page_path("people", "James Minahan"),
            "/people/james-minahan.html"
        );
        config.page_gen_dirs = true;
        config.collections.insert(
            "people".to_string(),
            CollectionConfig {
                dir: Some("persons".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            config.page_path("people", "James Minahan"),
            "/persons/james-minahan/"
        );
    }
}
