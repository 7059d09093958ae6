use std::{fmt, io};

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use serde_yaml::Error as YamlError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum LodError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Entity '{name}' is declared in both '{first}' and '{second}'")]
    Conflict {
        name: String,
        first: String,
        second: String,
    },
    #[error("File System error: {0}")]
    Io(String),
    #[error("Markup error: {0}")]
    Markup(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Malformed record: {0}")]
    Record(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LodError {
    fn from(src: toml::de::Error) -> LodError {
        LodError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<YamlError> for LodError {
    fn from(src: YamlError) -> LodError {
        LodError::Serialization(format!("Yaml deserialization error: {src}"))
    }
}

impl From<JsonError> for LodError {
    fn from(src: JsonError) -> LodError {
        LodError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for LodError {
    fn from(src: UrlParseError) -> LodError {
        LodError::Config(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for LodError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LodError::NotFound(format!("{x}")),
            _ => LodError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for LodError {
    fn from(x: fmt::Error) -> Self {
        LodError::Markup(format!("{x}"))
    }
}

impl From<RegexError> for LodError {
    fn from(x: RegexError) -> Self {
        LodError::Markup(format!("Label pattern failed to compile: {x}"))
    }
}
