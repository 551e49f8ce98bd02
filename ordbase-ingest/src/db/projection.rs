//! Read-only projection of the persisted graph
//!
//! The presentation layer consumes this shape; nothing here writes.

use ordbase_common::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Full read view of one word
#[derive(Debug, Clone, Serialize)]
pub struct WordGraph {
    pub word: String,
    pub language: String,
    pub etymology: Option<String>,
    pub frequency_rank: Option<i64>,
    pub relationships: Vec<RelationView>,
    pub senses: Vec<SenseView>,
}

/// One sense with its definitions, audio and sense-level relationships
#[derive(Debug, Clone, Serialize)]
pub struct SenseView {
    pub part_of_speech: String,
    pub variant: String,
    pub phonetic: Option<String>,
    pub gender: Option<String>,
    pub forms: Option<String>,
    pub frequency_rank: Option<i64>,
    pub definitions: Vec<DefinitionView>,
    pub audio: Vec<AudioView>,
    pub relationships: Vec<RelationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefinitionView {
    pub definition: String,
    pub is_primary: bool,
    pub is_short: bool,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioView {
    pub url: String,
    pub is_primary: bool,
}

/// A relationship edge seen from this word's side
#[derive(Debug, Clone, Serialize)]
pub struct RelationView {
    /// The other endpoint's word text
    pub word: String,
    pub relation_type: String,
    pub description: String,
    /// true when this word is the edge's source
    pub outgoing: bool,
}

/// Load the full graph view for (word, language); None when unknown
pub async fn load_word_graph(
    pool: &SqlitePool,
    word: &str,
    language: &str,
) -> Result<Option<WordGraph>> {
    let word_row = sqlx::query(
        "SELECT id, word, language, etymology, frequency_rank FROM words WHERE word = ? AND language = ?",
    )
    .bind(word)
    .bind(language)
    .fetch_optional(pool)
    .await?;

    let Some(word_row) = word_row else {
        return Ok(None);
    };
    let word_id: String = word_row.get("id");

    let relationships = word_level_relations(pool, &word_id).await?;

    let sense_rows = sqlx::query(
        r#"
        SELECT id, part_of_speech, variant, phonetic, gender, forms, frequency_rank
        FROM word_details
        WHERE word_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(&word_id)
    .fetch_all(pool)
    .await?;

    let mut senses = Vec::with_capacity(sense_rows.len());
    for row in sense_rows {
        let details_id: String = row.get("id");
        senses.push(SenseView {
            part_of_speech: row.get("part_of_speech"),
            variant: row.get("variant"),
            phonetic: row.get("phonetic"),
            gender: row.get("gender"),
            forms: row.get("forms"),
            frequency_rank: row.get("frequency_rank"),
            definitions: sense_definitions(pool, &details_id).await?,
            audio: sense_audio(pool, &details_id).await?,
            relationships: sense_relations(pool, &details_id).await?,
        });
    }

    Ok(Some(WordGraph {
        word: word_row.get("word"),
        language: word_row.get("language"),
        etymology: word_row.get("etymology"),
        frequency_rank: word_row.get("frequency_rank"),
        relationships,
        senses,
    }))
}

async fn word_level_relations(pool: &SqlitePool, word_id: &str) -> Result<Vec<RelationView>> {
    let rows = sqlx::query(
        r#"
        SELECT w.word AS other, r.relation_type, r.description,
               (r.from_word_id = ?) AS outgoing
        FROM word_relationships r
        JOIN words w ON w.id = CASE WHEN r.from_word_id = ? THEN r.to_word_id ELSE r.from_word_id END
        WHERE r.from_word_id = ? OR r.to_word_id = ?
        ORDER BY r.rowid
        "#,
    )
    .bind(word_id)
    .bind(word_id)
    .bind(word_id)
    .bind(word_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RelationView {
            word: row.get("other"),
            relation_type: row.get("relation_type"),
            description: row.get("description"),
            outgoing: row.get::<i64, _>("outgoing") != 0,
        })
        .collect())
}

async fn sense_relations(pool: &SqlitePool, details_id: &str) -> Result<Vec<RelationView>> {
    let rows = sqlx::query(
        r#"
        SELECT w.word AS other, r.relation_type, r.description,
               (r.from_details_id = ?) AS outgoing
        FROM word_details_relationships r
        JOIN word_details wd
            ON wd.id = CASE WHEN r.from_details_id = ? THEN r.to_details_id ELSE r.from_details_id END
        JOIN words w ON w.id = wd.word_id
        WHERE r.from_details_id = ? OR r.to_details_id = ?
        ORDER BY r.rowid
        "#,
    )
    .bind(details_id)
    .bind(details_id)
    .bind(details_id)
    .bind(details_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RelationView {
            word: row.get("other"),
            relation_type: row.get("relation_type"),
            description: row.get("description"),
            outgoing: row.get::<i64, _>("outgoing") != 0,
        })
        .collect())
}

async fn sense_definitions(pool: &SqlitePool, details_id: &str) -> Result<Vec<DefinitionView>> {
    let rows = sqlx::query(
        r#"
        SELECT d.id, d.definition, d.is_short, wdd.is_primary
        FROM word_details_definitions wdd
        JOIN definitions d ON d.id = wdd.definition_id
        WHERE wdd.word_details_id = ?
        ORDER BY wdd.rowid
        "#,
    )
    .bind(details_id)
    .fetch_all(pool)
    .await?;

    let mut definitions = Vec::with_capacity(rows.len());
    for row in rows {
        let definition_id: String = row.get("id");
        let examples: Vec<String> = sqlx::query_scalar(
            "SELECT example FROM definition_examples WHERE definition_id = ? ORDER BY rowid",
        )
        .bind(&definition_id)
        .fetch_all(pool)
        .await?;

        definitions.push(DefinitionView {
            definition: row.get("definition"),
            is_primary: row.get::<i64, _>("is_primary") != 0,
            is_short: row.get::<i64, _>("is_short") != 0,
            examples,
        });
    }

    Ok(definitions)
}

async fn sense_audio(pool: &SqlitePool, details_id: &str) -> Result<Vec<AudioView>> {
    let rows = sqlx::query(
        r#"
        SELECT a.url, wda.is_primary
        FROM word_details_audio wda
        JOIN audio a ON a.id = wda.audio_id
        WHERE wda.word_details_id = ?
        ORDER BY wda.rowid
        "#,
    )
    .bind(details_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| AudioView {
            url: row.get("url"),
            is_primary: row.get::<i64, _>("is_primary") != 0,
        })
        .collect())
}
