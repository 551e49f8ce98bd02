//! Database pool initialization and schema creation
//!
//! The normalized lexical schema: words, senses (word_details),
//! definitions, examples, audio and the two relationship tables. All
//! uniqueness constraints that drive idempotent upserts live here.

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Opens (or creates) the SQLite database and creates any missing
/// tables and indices.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the lexical schema if it does not exist
///
/// Also used by tests against `sqlite::memory:` pools.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id TEXT PRIMARY KEY,
            word TEXT NOT NULL,
            language TEXT NOT NULL,
            etymology TEXT,
            frequency_rank INTEGER,
            highlighted INTEGER NOT NULL DEFAULT 0,
            source_id TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(word, language)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_details (
            id TEXT PRIMARY KEY,
            word_id TEXT NOT NULL REFERENCES words(id),
            part_of_speech TEXT NOT NULL,
            variant TEXT NOT NULL DEFAULT '',
            phonetic TEXT,
            gender TEXT,
            is_plural INTEGER NOT NULL DEFAULT 0,
            forms TEXT,
            etymology TEXT,
            frequency_rank INTEGER,
            source TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(word_id, part_of_speech, variant)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS definitions (
            id TEXT PRIMARY KEY,
            definition TEXT NOT NULL,
            language TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT '',
            subject_labels TEXT,
            usage_labels TEXT,
            grammar_note TEXT,
            is_short INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(definition, language, source)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_details_definitions (
            word_details_id TEXT NOT NULL REFERENCES word_details(id),
            definition_id TEXT NOT NULL REFERENCES definitions(id),
            is_primary INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(word_details_id, definition_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS definition_examples (
            id TEXT PRIMARY KEY,
            definition_id TEXT NOT NULL REFERENCES definitions(id),
            example TEXT NOT NULL,
            grammar_note TEXT,
            source_text TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(definition_id, example)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audio (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            language TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(url, language)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_details_audio (
            word_details_id TEXT NOT NULL REFERENCES word_details(id),
            audio_id TEXT NOT NULL REFERENCES audio(id),
            is_primary INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(word_details_id, audio_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_relationships (
            id TEXT PRIMARY KEY,
            from_word_id TEXT NOT NULL REFERENCES words(id),
            to_word_id TEXT NOT NULL REFERENCES words(id),
            relation_type TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(from_word_id, to_word_id, relation_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_details_relationships (
            id TEXT PRIMARY KEY,
            from_details_id TEXT NOT NULL REFERENCES word_details(id),
            to_details_id TEXT NOT NULL REFERENCES word_details(id),
            relation_type TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(from_details_id, to_details_id, relation_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Lookup indices for the read projection and endpoint resolution
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_words_word ON words(word, language)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_word_details_word_id ON word_details(word_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_details_audio_details ON word_details_audio(word_details_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (lexical schema)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_tables_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        init_tables(&pool).await.expect("first init");
        init_tables(&pool).await.expect("second init");

        // Unique constraint present on words(word, language)
        sqlx::query("INSERT INTO words (id, word, language) VALUES ('a', 'hus', 'da')")
            .execute(&pool)
            .await
            .expect("insert");
        let dup = sqlx::query("INSERT INTO words (id, word, language) VALUES ('b', 'hus', 'da')")
            .execute(&pool)
            .await;
        assert!(dup.is_err(), "duplicate (word, language) must be rejected");
    }

    #[tokio::test]
    async fn test_init_database_pool_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("sub").join("ordbase.db");

        let pool = init_database_pool(&db_path).await.expect("init pool");
        assert!(db_path.exists());

        sqlx::query("SELECT COUNT(*) FROM word_details_relationships")
            .execute(&pool)
            .await
            .expect("schema present");
    }
}
