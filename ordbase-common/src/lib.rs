//! # ordbase Common Library
//!
//! Shared code for the ordbase services including:
//! - Database pool initialization and schema
//! - Domain enums (Language, PartOfSpeech, Gender, RelationType)
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Gender, Language, PartOfSpeech, RelationLevel, RelationType};
