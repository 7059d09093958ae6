//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

/// Write a Jekyll-style `_config.yml` and a `data.json` dataset into `temp_dir`.
///
/// Returns `(config_path, dataset_path)`.
///
/// The dataset declares `Hobart` twice (places first, then organisations) so tests can exercise
/// conflict handling.
#[allow(dead_code)]
pub fn create_test_site(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let config = r#"
title: Minahan family
url: "https://example.org"
baseurl: "/ed"
page_gen-dirs: true
data_types:
  people:
    template: person
    type: Person
  places:
    template: place
    type: Place
"#;
    let config_path = temp_dir.path().join("_config.yml");
    std::fs::write(&config_path, config).unwrap();

    let dataset = r#"[
  {"name": "James Minahan", "collection": "people",
   "data": {"birthPlace": {"name": "Hobart", "collection": "places"},
            "knows": [{"name": "Mary Minahan", "collection": "people"}, "a neighbour"]}},
  {"name": "Mary Minahan", "collection": "people", "data": {}},
  {"name": "James", "collection": "people"},
  {"name": "Hobart", "collection": "places"},
  {"name": "Hobart", "collection": "organisations"}
]"#;
    let dataset_path = temp_dir.path().join("data.json");
    std::fs::write(&dataset_path, dataset).unwrap();

    (config_path, dataset_path)
}
