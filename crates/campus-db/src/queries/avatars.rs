//! Avatar record persistence.
//!
//! The `avatars` table holds at most one row per student (`student_id` is
//! UNIQUE); `upsert` is the only write path and enforces that invariant by
//! updating the existing row in place, preserving its surrogate `id`.

use campus_core::{Error, Result, StudentId};
use rusqlite::Connection;

use crate::models::Avatar;

const COLS: &str = "id, student_id, file_path, media_type, file_size, data";

/// Find the avatar record for a student, if one exists.
pub fn find_by_student(conn: &Connection, student_id: StudentId) -> Result<Option<Avatar>> {
    let q = format!("SELECT {COLS} FROM avatars WHERE student_id = ?1");
    let result = conn.query_row(&q, [student_id.value()], Avatar::from_row);
    match result {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Insert a new avatar record, or update the existing one for the student.
///
/// The surrogate `id` is assigned on first insert and stable across later
/// updates.
pub fn upsert(
    conn: &Connection,
    student_id: StudentId,
    file_path: &str,
    media_type: &str,
    file_size: i64,
    data: &[u8],
) -> Result<Avatar> {
    conn.execute(
        "INSERT INTO avatars (student_id, file_path, media_type, file_size, data)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(student_id) DO UPDATE SET
            file_path  = excluded.file_path,
            media_type = excluded.media_type,
            file_size  = excluded.file_size,
            data       = excluded.data",
        rusqlite::params![student_id.value(), file_path, media_type, file_size, data],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    // Re-read to pick up the surrogate id (first insert or preserved).
    find_by_student(conn, student_id)?
        .ok_or_else(|| Error::Internal("avatar row missing after upsert".into()))
}

/// Return a slice of the avatar collection ordered by `id` ascending.
pub fn page(conn: &Connection, offset: i64, limit: i64) -> Result<Vec<Avatar>> {
    let q = format!("SELECT {COLS} FROM avatars ORDER BY id ASC LIMIT ?1 OFFSET ?2");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params![limit, offset], Avatar::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
