//! Word table operations
//!
//! A Word is a (text, language) pair. Etymology and frequency are
//! enrichment fields: the update path only overwrites them when a
//! non-null replacement is supplied, so a later, less-informed upsert
//! can never blank previously stored richer data.

use ordbase_common::{Language, Result};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

/// Word row
#[derive(Debug, Clone)]
pub struct Word {
    pub id: Uuid,
    pub word: String,
    pub language: String,
    pub etymology: Option<String>,
    pub frequency_rank: Option<i64>,
    pub highlighted: bool,
    pub source_id: Option<String>,
}

/// Fields for a word upsert
#[derive(Debug, Clone, Default)]
pub struct NewWord {
    pub word: String,
    pub language: String,
    pub etymology: Option<String>,
    pub frequency_rank: Option<i64>,
    pub highlighted: bool,
    pub source_id: Option<String>,
}

impl NewWord {
    pub fn new(word: impl Into<String>, language: Language) -> Self {
        Self {
            word: word.into(),
            language: language.code().to_string(),
            ..Default::default()
        }
    }
}

/// Upsert a word by (word, language), returning its id
///
/// On conflict, nullable enrichment columns keep their stored value
/// unless the incoming value is non-null.
pub async fn upsert_word(conn: &mut SqliteConnection, new: &NewWord) -> Result<Uuid> {
    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO words (id, word, language, etymology, frequency_rank, highlighted, source_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(word, language) DO UPDATE SET
            etymology = COALESCE(excluded.etymology, words.etymology),
            frequency_rank = COALESCE(excluded.frequency_rank, words.frequency_rank),
            highlighted = MAX(words.highlighted, excluded.highlighted),
            source_id = COALESCE(excluded.source_id, words.source_id),
            updated_at = CURRENT_TIMESTAMP
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&new.word)
    .bind(&new.language)
    .bind(&new.etymology)
    .bind(new.frequency_rank)
    .bind(new.highlighted)
    .bind(&new.source_id)
    .fetch_one(conn)
    .await?;

    Ok(Uuid::parse_str(&id).map_err(|e| ordbase_common::Error::Internal(e.to_string()))?)
}

/// Load a word by (word, language)
pub async fn load_word(
    conn: &mut SqliteConnection,
    word: &str,
    language: &str,
) -> Result<Option<Word>> {
    let row = sqlx::query(
        r#"
        SELECT id, word, language, etymology, frequency_rank, highlighted, source_id
        FROM words
        WHERE word = ? AND language = ?
        "#,
    )
    .bind(word)
    .bind(language)
    .fetch_optional(conn)
    .await?;

    match row {
        Some(row) => {
            let id_str: String = row.get("id");
            Ok(Some(Word {
                id: Uuid::parse_str(&id_str)
                    .map_err(|e| ordbase_common::Error::Internal(e.to_string()))?,
                word: row.get("word"),
                language: row.get("language"),
                etymology: row.get("etymology"),
                frequency_rank: row.get("frequency_rank"),
                highlighted: row.get::<i64, _>("highlighted") != 0,
                source_id: row.get("source_id"),
            }))
        }
        None => Ok(None),
    }
}
