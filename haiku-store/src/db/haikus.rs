//! Haiku table operations
//!
//! One row per record: three lines, three syllable counts, and a
//! fixed-width RFC 3339 timestamp (microseconds, `Z`) so that text order
//! equals time order.

use chrono::{DateTime, SecondsFormat, Utc};
use haiku_common::{HaikuId, HaikuLines, HaikuRecord, StoreError, StoreResult, UpstreamError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_COLUMNS: &str =
    "SELECT id, line1, line2, line3, syllables1, syllables2, syllables3, created_at FROM haikus";

/// Render a timestamp the way it is stored
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Unavailable(UpstreamError::malformed(format!("bad created_at '{raw}': {e}"))))
}

fn record_from_row(row: &SqliteRow) -> StoreResult<HaikuRecord> {
    let created_at: String = row.try_get("created_at")?;
    Ok(HaikuRecord {
        id: HaikuId::from_seq(row.try_get("id")?),
        lines: [row.try_get("line1")?, row.try_get("line2")?, row.try_get("line3")?],
        created_at: parse_timestamp(&created_at)?,
        syllable_counts: [
            row.try_get("syllables1")?,
            row.try_get("syllables2")?,
            row.try_get("syllables3")?,
        ],
    })
}

/// Insert one haiku and return the id SQLite assigned to it
pub async fn insert_haiku(
    pool: &SqlitePool,
    lines: &HaikuLines,
    syllable_counts: [u32; 3],
    created_at: DateTime<Utc>,
) -> StoreResult<HaikuId> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO haikus (line1, line2, line3, syllables1, syllables2, syllables3, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&lines[0])
    .bind(&lines[1])
    .bind(&lines[2])
    .bind(syllable_counts[0])
    .bind(syllable_counts[1])
    .bind(syllable_counts[2])
    .bind(format_timestamp(created_at))
    .fetch_one(pool)
    .await?;

    Ok(HaikuId::from_seq(id))
}

/// Load one haiku by id
pub async fn load_haiku(pool: &SqlitePool, id: HaikuId) -> StoreResult<HaikuRecord> {
    let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id.seq())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::not_found(id))?;

    record_from_row(&row)
}

/// Page through haikus, oldest first
pub async fn list_haikus(pool: &SqlitePool, limit: i64, offset: i64) -> StoreResult<Vec<HaikuRecord>> {
    let rows = sqlx::query(&format!(
        "{SELECT_COLUMNS} ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Page through haikus whose text contains `query` (ASCII case-insensitive)
pub async fn search_haikus(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
    offset: i64,
) -> StoreResult<Vec<HaikuRecord>> {
    let rows = sqlx::query(&format!(
        "{SELECT_COLUMNS} \
         WHERE instr(lower(line1 || char(10) || line2 || char(10) || line3), lower(?)) > 0 \
         ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?"
    ))
    .bind(query)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Delete one haiku; NotFound if no row matched
pub async fn delete_haiku(pool: &SqlitePool, id: HaikuId) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM haikus WHERE id = ?")
        .bind(id.seq())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found(id));
    }
    Ok(())
}

/// Count stored haikus
pub async fn count_haikus(pool: &SqlitePool) -> StoreResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM haikus")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(a), "2025-01-02T03:04:05.000000Z");
        let parsed = parse_timestamp(&format_timestamp(a)).unwrap();
        assert_eq!(parsed, a);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(parse_timestamp("yesterday"), Err(StoreError::Unavailable(_))));
    }
}
