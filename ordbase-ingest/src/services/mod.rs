//! Enrichment collaborator clients
//!
//! Frequency lookup, translation and audio mirroring are consumed as
//! opaque request/response collaborators. Every client is optional on
//! the engine; an absent or failing collaborator degrades ingestion
//! (null frequency, untranslated graph, remote audio URL) instead of
//! failing it.

pub mod audio_store;
pub mod frequency;
pub mod translation;

pub use audio_store::{AudioStore, DownloadOutcome};
pub use frequency::{FrequencyClient, FrequencyData};
pub use translation::{TranslationClient, TranslationRequest};
