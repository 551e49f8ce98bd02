//! WordDetails table operations
//!
//! A WordDetails row is one sense of a word, scoped by
//! (part_of_speech, variant). Two write paths exist:
//! - `upsert_details` — the canonical upsert used for the entry's own
//!   headword sense; non-null incoming values replace stored ones.
//! - `enrich_details` — fill-only update used during relationship
//!   resolution; it only sets columns that are currently NULL, so a
//!   sub-word pass can never downgrade an existing sense.

use ordbase_common::Result;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

/// WordDetails row
#[derive(Debug, Clone)]
pub struct WordDetails {
    pub id: Uuid,
    pub word_id: Uuid,
    pub part_of_speech: String,
    pub variant: String,
    pub phonetic: Option<String>,
    pub gender: Option<String>,
    pub is_plural: bool,
    pub forms: Option<String>,
    pub etymology: Option<String>,
    pub frequency_rank: Option<i64>,
    pub source: Option<String>,
}

/// Fields for a details upsert
#[derive(Debug, Clone, Default)]
pub struct NewWordDetails {
    pub word_id: Uuid,
    pub part_of_speech: String,
    pub variant: String,
    pub phonetic: Option<String>,
    pub gender: Option<String>,
    pub is_plural: bool,
    pub forms: Option<String>,
    pub etymology: Option<String>,
    pub frequency_rank: Option<i64>,
    pub source: Option<String>,
}

/// Upsert a sense by (word_id, part_of_speech, variant), returning its id
pub async fn upsert_details(conn: &mut SqliteConnection, new: &NewWordDetails) -> Result<Uuid> {
    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO word_details (
            id, word_id, part_of_speech, variant, phonetic, gender, is_plural,
            forms, etymology, frequency_rank, source
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(word_id, part_of_speech, variant) DO UPDATE SET
            phonetic = COALESCE(excluded.phonetic, word_details.phonetic),
            gender = COALESCE(excluded.gender, word_details.gender),
            is_plural = MAX(word_details.is_plural, excluded.is_plural),
            forms = COALESCE(excluded.forms, word_details.forms),
            etymology = COALESCE(excluded.etymology, word_details.etymology),
            frequency_rank = COALESCE(excluded.frequency_rank, word_details.frequency_rank),
            source = COALESCE(excluded.source, word_details.source),
            updated_at = CURRENT_TIMESTAMP
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(new.word_id.to_string())
    .bind(&new.part_of_speech)
    .bind(&new.variant)
    .bind(&new.phonetic)
    .bind(&new.gender)
    .bind(new.is_plural)
    .bind(&new.forms)
    .bind(&new.etymology)
    .bind(new.frequency_rank)
    .bind(&new.source)
    .fetch_one(conn)
    .await?;

    parse_id(&id)
}

/// Find an existing sense for (word_id, part_of_speech), any variant.
/// The oldest row wins so repeated resolutions are stable.
pub async fn find_details_by_pos(
    conn: &mut SqliteConnection,
    word_id: Uuid,
    part_of_speech: &str,
) -> Result<Option<WordDetails>> {
    let row = sqlx::query(
        r#"
        SELECT id, word_id, part_of_speech, variant, phonetic, gender, is_plural,
               forms, etymology, frequency_rank, source
        FROM word_details
        WHERE word_id = ? AND part_of_speech = ?
        ORDER BY rowid
        LIMIT 1
        "#,
    )
    .bind(word_id.to_string())
    .bind(part_of_speech)
    .fetch_optional(conn)
    .await?;

    row.map(row_to_details).transpose()
}

/// Fill-only enrichment of an existing sense: columns that already
/// hold a value are left untouched
pub async fn enrich_details(
    conn: &mut SqliteConnection,
    details_id: Uuid,
    phonetic: Option<&str>,
    gender: Option<&str>,
    forms: Option<&str>,
    etymology: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE word_details SET
            phonetic = COALESCE(phonetic, ?),
            gender = COALESCE(gender, ?),
            forms = COALESCE(forms, ?),
            etymology = COALESCE(etymology, ?),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(phonetic)
    .bind(gender)
    .bind(forms)
    .bind(etymology)
    .bind(details_id.to_string())
    .execute(conn)
    .await?;

    Ok(())
}

/// Load a sense by id
pub async fn load_details(
    conn: &mut SqliteConnection,
    details_id: Uuid,
) -> Result<Option<WordDetails>> {
    let row = sqlx::query(
        r#"
        SELECT id, word_id, part_of_speech, variant, phonetic, gender, is_plural,
               forms, etymology, frequency_rank, source
        FROM word_details
        WHERE id = ?
        "#,
    )
    .bind(details_id.to_string())
    .fetch_optional(conn)
    .await?;

    row.map(row_to_details).transpose()
}

fn row_to_details(row: sqlx::sqlite::SqliteRow) -> Result<WordDetails> {
    let id: String = row.get("id");
    let word_id: String = row.get("word_id");
    Ok(WordDetails {
        id: parse_id(&id)?,
        word_id: parse_id(&word_id)?,
        part_of_speech: row.get("part_of_speech"),
        variant: row.get("variant"),
        phonetic: row.get("phonetic"),
        gender: row.get("gender"),
        is_plural: row.get::<i64, _>("is_plural") != 0,
        forms: row.get("forms"),
        etymology: row.get("etymology"),
        frequency_rank: row.get("frequency_rank"),
        source: row.get("source"),
    })
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| ordbase_common::Error::Internal(e.to_string()))
}
