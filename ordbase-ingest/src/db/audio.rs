//! Audio table operations
//!
//! Audio rows dedup on (url, language); links to senses carry the
//! `is_primary` flag. The invariant maintained by the reconciler —
//! at most one primary link per sense — is enforced through the
//! demote/promote helpers here, always inside the entry's transaction.

use ordbase_common::Result;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

/// Upsert an audio asset by (url, language), returning its id
pub async fn upsert_audio(
    conn: &mut SqliteConnection,
    url: &str,
    language: &str,
) -> Result<Uuid> {
    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO audio (id, url, language)
        VALUES (?, ?, ?)
        ON CONFLICT(url, language) DO UPDATE SET url = excluded.url
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(url)
    .bind(language)
    .fetch_one(conn)
    .await?;

    Uuid::parse_str(&id).map_err(|e| ordbase_common::Error::Internal(e.to_string()))
}

/// Link an audio asset to a sense
pub async fn upsert_audio_link(
    conn: &mut SqliteConnection,
    word_details_id: Uuid,
    audio_id: Uuid,
    is_primary: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO word_details_audio (word_details_id, audio_id, is_primary)
        VALUES (?, ?, ?)
        ON CONFLICT(word_details_id, audio_id) DO UPDATE SET
            is_primary = excluded.is_primary
        "#,
    )
    .bind(word_details_id.to_string())
    .bind(audio_id.to_string())
    .bind(is_primary)
    .execute(conn)
    .await?;

    Ok(())
}

/// Demote every primary link for a sense except the given audio id
pub async fn demote_other_primaries(
    conn: &mut SqliteConnection,
    word_details_id: Uuid,
    keep_audio_id: Uuid,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE word_details_audio SET is_primary = 0
        WHERE word_details_id = ? AND audio_id != ? AND is_primary = 1
        "#,
    )
    .bind(word_details_id.to_string())
    .bind(keep_audio_id.to_string())
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Delete non-primary links for a sense, excluding the given audio ids.
/// Used to keep at most one non-primary link alongside the primary.
pub async fn delete_non_primary_links_except(
    conn: &mut SqliteConnection,
    word_details_id: Uuid,
    keep: &[Uuid],
) -> Result<u64> {
    let keep_json: Vec<String> = keep.iter().map(|id| id.to_string()).collect();
    // Small fixed list; a dynamic IN clause is not worth the ceremony
    let rows = sqlx::query(
        r#"
        SELECT audio_id FROM word_details_audio
        WHERE word_details_id = ? AND is_primary = 0
        "#,
    )
    .bind(word_details_id.to_string())
    .fetch_all(&mut *conn)
    .await?;

    let mut deleted = 0;
    for row in rows {
        let audio_id: String = row.get("audio_id");
        if keep_json.contains(&audio_id) {
            continue;
        }
        sqlx::query(
            "DELETE FROM word_details_audio WHERE word_details_id = ? AND audio_id = ?",
        )
        .bind(word_details_id.to_string())
        .bind(&audio_id)
        .execute(&mut *conn)
        .await?;
        deleted += 1;
    }

    Ok(deleted)
}

/// Audio links for a sense as (audio_id, url, is_primary)
pub async fn load_audio_links(
    conn: &mut SqliteConnection,
    word_details_id: Uuid,
) -> Result<Vec<(Uuid, String, bool)>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.url, wda.is_primary
        FROM word_details_audio wda
        JOIN audio a ON a.id = wda.audio_id
        WHERE wda.word_details_id = ?
        ORDER BY wda.rowid
        "#,
    )
    .bind(word_details_id.to_string())
    .fetch_all(conn)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id: String = row.get("id");
            let id = Uuid::parse_str(&id)
                .map_err(|e| ordbase_common::Error::Internal(e.to_string()))?;
            Ok((id, row.get("url"), row.get::<i64, _>("is_primary") != 0))
        })
        .collect()
}
