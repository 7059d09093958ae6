//! Entity records and the name → collection lookup used to resolve mentions.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs::read_to_string,
    path::Path,
};

use crate::{error::LodError, slug::slugify};

/// A named record belonging to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub collection: String,
}

impl Entity {
    pub fn new(name: &str, collection: &str) -> Entity {
        Entity {
            name: name.to_string(),
            collection: collection.to_string(),
        }
    }
}

/// A dataset record as it appears in the site's data file: an entity plus its structured
/// attributes. Keys other than `name`, `collection` and `data` are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub name: String,
    pub collection: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataRecord {
    pub fn entity(&self) -> Entity {
        Entity::new(&self.name, &self.collection)
    }
}

/// Read a sequence of [DataRecord]s from a JSON or YAML file.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<DataRecord>, LodError> {
    let path = path.as_ref();
    tracing::debug!("Reading dataset from {:?}", path);
    let content = read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yml") | Some("yaml") => {
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            Ok(serde_yaml::from_str(&content)?)
        }
        other => Err(LodError::Config(format!(
            "Unsupported dataset format {other:?} for {path:?}"
        ))),
    }
}

/// What to do when two dataset records share a name but name different collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// The first record in dataset order wins; later ones are logged and skipped.
    #[default]
    KeepFirst,
    /// Refuse to build the index.
    Reject,
}

/// A resolved pointer to an entity: its link target plus the display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    pub name: String,
    pub collection: String,
}

/// `<base_url>/<collection>/<slug(name)>/`
pub fn url_for(collection: &str, name: &str, base_url: &str) -> String {
    format!(
        "{}/{}/{}/",
        base_url,
        collection.to_lowercase(),
        slugify(name)
    )
}

/// Absolute identifier of an entity: `<site_url><base_url>/<collection>/<slug(name)>/`.
pub fn entity_url(site_url: &str, base_url: &str, collection: &str, name: &str) -> String {
    format!("{}{}", site_url, url_for(collection, name, base_url))
}

/// Immutable name → collection lookup, built once per site build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIndex {
    collections: BTreeMap<String, String>,
}

impl EntityIndex {
    /// Index entities in the given order. A repeated name never overwrites an earlier one.
    pub fn build<I>(entities: I) -> EntityIndex
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut collections = BTreeMap::new();
        for entity in entities {
            insert_first(&mut collections, entity);
        }
        EntityIndex { collections }
    }

    pub fn build_with_policy<I>(entities: I, policy: ConflictPolicy) -> Result<EntityIndex, LodError>
    where
        I: IntoIterator<Item = Entity>,
    {
        match policy {
            ConflictPolicy::KeepFirst => Ok(EntityIndex::build(entities)),
            ConflictPolicy::Reject => {
                let mut collections: BTreeMap<String, String> = BTreeMap::new();
                for entity in entities {
                    if let Some(first) = collections.get(&entity.name) {
                        if *first != entity.collection {
                            return Err(LodError::Conflict {
                                name: entity.name,
                                first: first.clone(),
                                second: entity.collection,
                            });
                        }
                        continue;
                    }
                    collections.insert(entity.name, entity.collection);
                }
                Ok(EntityIndex { collections })
            }
        }
    }

    pub fn from_records(records: &[DataRecord], policy: ConflictPolicy) -> Result<EntityIndex, LodError> {
        EntityIndex::build_with_policy(records.iter().map(DataRecord::entity), policy)
    }

    /// Exact lookup of the collection an entity name belongs to.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.collections.get(name).map(String::as_str)
    }

    pub fn reference(&self, name: &str, base_url: &str) -> Option<Reference> {
        self.resolve(name).map(|collection| Reference {
            url: url_for(collection, name, base_url),
            name: name.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Indexed `(name, collection)` pairs, ordered by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.collections
            .iter()
            .map(|(name, collection)| (name.as_str(), collection.as_str()))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

fn insert_first(collections: &mut BTreeMap<String, String>, entity: Entity) {
    match collections.entry(entity.name) {
        Entry::Vacant(slot) => {
            slot.insert(entity.collection);
        }
        Entry::Occupied(existing) => {
            if *existing.get() != entity.collection {
                tracing::warn!(
                    "Ambiguous entity name '{}': keeping collection '{}', skipping '{}'",
                    existing.key(),
                    existing.get(),
                    entity.collection
                );
            }
        }
    }
}
