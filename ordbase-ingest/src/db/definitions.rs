//! Definition and example table operations
//!
//! Definitions dedup on (definition, language, source); examples on
//! (definition_id, example). Label lists are stored as JSON arrays.

use ordbase_common::Result;
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Fields for a definition upsert
#[derive(Debug, Clone, Default)]
pub struct NewDefinition {
    pub definition: String,
    pub language: String,
    pub source: String,
    pub subject_labels: Vec<String>,
    pub usage_labels: Vec<String>,
    pub grammar_note: Option<String>,
    pub is_short: bool,
}

/// Upsert a definition, returning its id
pub async fn upsert_definition(
    conn: &mut SqliteConnection,
    new: &NewDefinition,
) -> Result<Uuid> {
    let subject_labels = labels_json(&new.subject_labels);
    let usage_labels = labels_json(&new.usage_labels);

    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO definitions (
            id, definition, language, source, subject_labels, usage_labels,
            grammar_note, is_short
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(definition, language, source) DO UPDATE SET
            subject_labels = COALESCE(excluded.subject_labels, definitions.subject_labels),
            usage_labels = COALESCE(excluded.usage_labels, definitions.usage_labels),
            grammar_note = COALESCE(excluded.grammar_note, definitions.grammar_note),
            is_short = MAX(definitions.is_short, excluded.is_short),
            updated_at = CURRENT_TIMESTAMP
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&new.definition)
    .bind(&new.language)
    .bind(&new.source)
    .bind(subject_labels)
    .bind(usage_labels)
    .bind(&new.grammar_note)
    .bind(new.is_short)
    .fetch_one(conn)
    .await?;

    Uuid::parse_str(&id).map_err(|e| ordbase_common::Error::Internal(e.to_string()))
}

fn labels_json(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        serde_json::to_string(labels).ok()
    }
}

/// Link a definition to a sense, keeping the primary flag sticky
pub async fn link_definition(
    conn: &mut SqliteConnection,
    word_details_id: Uuid,
    definition_id: Uuid,
    is_primary: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO word_details_definitions (word_details_id, definition_id, is_primary)
        VALUES (?, ?, ?)
        ON CONFLICT(word_details_id, definition_id) DO UPDATE SET
            is_primary = MAX(word_details_definitions.is_primary, excluded.is_primary)
        "#,
    )
    .bind(word_details_id.to_string())
    .bind(definition_id.to_string())
    .bind(is_primary)
    .execute(conn)
    .await?;

    Ok(())
}

/// Upsert an example sentence under a definition
pub async fn upsert_example(
    conn: &mut SqliteConnection,
    definition_id: Uuid,
    example: &str,
    grammar_note: Option<&str>,
    source_text: Option<&str>,
) -> Result<Uuid> {
    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO definition_examples (id, definition_id, example, grammar_note, source_text)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(definition_id, example) DO UPDATE SET
            grammar_note = COALESCE(excluded.grammar_note, definition_examples.grammar_note),
            source_text = COALESCE(excluded.source_text, definition_examples.source_text)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(definition_id.to_string())
    .bind(example)
    .bind(grammar_note)
    .bind(source_text)
    .fetch_one(conn)
    .await?;

    Uuid::parse_str(&id).map_err(|e| ordbase_common::Error::Internal(e.to_string()))
}
