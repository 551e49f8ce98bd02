//! Database access for the ingest service
//!
//! One module per table group, plain async functions over
//! `&mut SqliteConnection` so every write can run inside the
//! per-entry transaction. All inserts are upserts keyed by the
//! schema's uniqueness constraints, which is what makes re-ingestion
//! idempotent.

pub mod audio;
pub mod definitions;
pub mod projection;
pub mod relationships;
pub mod word_details;
pub mod words;
