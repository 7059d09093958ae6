//! Shared fixtures for unit tests

use crate::{
    config::SiteConfig,
    entity::{Entity, EntityIndex},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// `https://example.org` + `/ed`, schema.org context.
pub fn site_config() -> SiteConfig {
    init_logging();
    SiteConfig::new("https://example.org", "/ed").unwrap()
}

/// Index over a small people/places dataset, including a name that is declared twice.
pub fn minahan_index() -> EntityIndex {
    init_logging();
    EntityIndex::build(vec![
        Entity::new("James Minahan", "people"),
        Entity::new("James", "people"),
        Entity::new("Mary Minahan", "people"),
        Entity::new("Hobart", "places"),
        Entity::new("Tasmania", "places"),
        Entity::new("Hobart", "organisations"),
    ])
}
