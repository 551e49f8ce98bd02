//! Relationship edge operations
//!
//! Two granularities: coarse Word-to-Word edges and sense-specific
//! WordDetails-to-WordDetails edges. Both dedup on (from, to, type)
//! and carry the type's fixed human-readable description.

use ordbase_common::{RelationType, Result};
use sqlx::SqliteConnection;
use uuid::Uuid;

/// Upsert a Word-to-Word edge
pub async fn upsert_word_relationship(
    conn: &mut SqliteConnection,
    from_word_id: Uuid,
    to_word_id: Uuid,
    relation_type: RelationType,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO word_relationships (id, from_word_id, to_word_id, relation_type, description)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(from_word_id, to_word_id, relation_type) DO UPDATE SET
            description = excluded.description
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(from_word_id.to_string())
    .bind(to_word_id.to_string())
    .bind(relation_type.as_str())
    .bind(relation_type.description())
    .execute(conn)
    .await?;

    Ok(())
}

/// Upsert a WordDetails-to-WordDetails edge
pub async fn upsert_details_relationship(
    conn: &mut SqliteConnection,
    from_details_id: Uuid,
    to_details_id: Uuid,
    relation_type: RelationType,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO word_details_relationships (id, from_details_id, to_details_id, relation_type, description)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(from_details_id, to_details_id, relation_type) DO UPDATE SET
            description = excluded.description
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(from_details_id.to_string())
    .bind(to_details_id.to_string())
    .bind(relation_type.as_str())
    .bind(relation_type.description())
    .execute(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::words::{upsert_word, NewWord};
    use ordbase_common::db::init_tables;
    use ordbase_common::Language;
    use sqlx::SqlitePool;

    #[tokio::test]
    async fn test_word_relationship_dedup() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        init_tables(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let a = upsert_word(&mut conn, &NewWord::new("hus", Language::Danish))
            .await
            .unwrap();
        let b = upsert_word(&mut conn, &NewWord::new("husbåd", Language::Danish))
            .await
            .unwrap();

        upsert_word_relationship(&mut conn, a, b, RelationType::Composition)
            .await
            .unwrap();
        upsert_word_relationship(&mut conn, a, b, RelationType::Composition)
            .await
            .unwrap();
        // Same pair, different type: a second edge
        upsert_word_relationship(&mut conn, a, b, RelationType::Related)
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM word_relationships")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 2);

        let description: String = sqlx::query_scalar(
            "SELECT description FROM word_relationships WHERE relation_type = 'composition'",
        )
        .fetch_one(&mut *conn)
        .await
        .unwrap();
        assert_eq!(description, "composition");
    }
}
