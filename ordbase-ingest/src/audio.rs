//! Pronunciation audio reconciliation
//!
//! Source entries attach several recordings to one entry: the headword
//! pronunciation, in-compound variants, and recordings belonging to
//! nested expressions. Selection follows the tag chain rule: an
//! eligible run starts at a recording tagged with the headword itself
//! (or the generic "udtale" marker, or no tag at all) and continues
//! through in-compound continuation tags. Recordings outside the run
//! belong to other forms and are ignored here.
//!
//! Reconciliation then maintains two invariants on the sense's links:
//! at most one primary recording, and at most one retained non-primary
//! alternate.

use crate::db::audio::{
    delete_non_primary_links_except, demote_other_primaries, upsert_audio, upsert_audio_link,
};
use crate::types::AudioRef;
use ordbase_common::Result;
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Generic pronunciation marker used instead of the headword
const PRONUNCIATION_TAG: &str = "udtale";

/// Tags marking an in-compound recording that continues the run
const CONTINUATION_TAGS: &[&str] = &["i sms.", "i sammensætning"];

/// Select the eligible pronunciation run for a headword.
/// Returned refs keep input order; the first one is the candidate
/// primary recording.
pub fn select_pronunciations<'a>(headword: &str, refs: &'a [AudioRef]) -> Vec<&'a AudioRef> {
    let headword = headword.trim().to_lowercase();
    let mut selected = Vec::new();
    let mut in_run = false;

    for audio in refs {
        let tag = audio
            .word_tag
            .as_deref()
            .map(|t| t.trim().to_lowercase());

        let starts_run = match tag.as_deref() {
            None => true,
            Some(t) => t == headword || t == PRONUNCIATION_TAG,
        };
        let continues_run = matches!(tag.as_deref(), Some(t) if CONTINUATION_TAGS.contains(&t));

        if starts_run {
            selected.push(audio);
            in_run = true;
        } else if in_run && continues_run {
            selected.push(audio);
        } else {
            in_run = false;
        }
    }

    selected
}

/// Write the selected recordings for one sense and enforce the link
/// invariants. `urls` is the eligible run in order (already mirrored);
/// at most the first two are linked. Returns the number of links
/// written.
pub async fn reconcile(
    conn: &mut SqliteConnection,
    word_details_id: Uuid,
    language: &str,
    urls: &[String],
    first_is_primary: bool,
) -> Result<usize> {
    let mut ids = Vec::new();
    for url in urls.iter().take(2) {
        ids.push(upsert_audio(&mut *conn, url, language).await?);
    }

    if ids.is_empty() {
        return Ok(0);
    }

    if first_is_primary {
        upsert_audio_link(&mut *conn, word_details_id, ids[0], true).await?;
        demote_other_primaries(&mut *conn, word_details_id, ids[0]).await?;
        // Older non-primaries (including a just-demoted primary) are
        // only displaced when this batch brings its own alternate
        if let Some(alternate) = ids.get(1).copied() {
            upsert_audio_link(&mut *conn, word_details_id, alternate, false).await?;
            delete_non_primary_links_except(&mut *conn, word_details_id, &[alternate]).await?;
        }
    } else {
        // No primary claim: the first recording becomes the retained
        // alternate and any existing primary stays in place
        upsert_audio_link(&mut *conn, word_details_id, ids[0], false).await?;
        delete_non_primary_links_except(&mut *conn, word_details_id, &[ids[0]]).await?;
    }

    Ok(ids.len())
}
