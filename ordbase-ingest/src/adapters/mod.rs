//! Source adapters
//!
//! One adapter per inbound raw-entry format. All source-specific
//! parsing stays inside the adapter; each produces the canonical
//! `ProcessedWordData`, so the persistence engine never sees a
//! source-shaped payload.

pub mod ddo;
pub mod mw;

use crate::types::ProcessedWordData;
use serde::Deserialize;

/// A raw entry in one of the supported source formats
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawEntry {
    /// Danish dictionary style (DDO)
    Ddo(ddo::DdoEntry),
    /// Merriam-Webster collegiate API style
    MerriamWebster(mw::MwEntry),
}

impl RawEntry {
    /// The headword, for error reporting before adaptation
    pub fn headword(&self) -> String {
        match self {
            RawEntry::Ddo(entry) => entry.headword.trim().to_string(),
            RawEntry::MerriamWebster(entry) => mw::strip_syllable_marks(&entry.hwi.hw),
        }
    }

    /// Decompose into the canonical internal shape
    pub fn process(&self) -> ProcessedWordData {
        match self {
            RawEntry::Ddo(entry) => ddo::process(entry),
            RawEntry::MerriamWebster(entry) => mw::process(entry),
        }
    }
}
