//! Faculty CRUD and search operations.

use campus_core::{Error, FacultyId, Result};
use rusqlite::Connection;

use crate::models::Faculty;

const COLS: &str = "id, name, color";

/// Create a new faculty.
pub fn create_faculty(conn: &Connection, name: &str, color: &str) -> Result<Faculty> {
    conn.execute(
        "INSERT INTO faculties (name, color) VALUES (?1, ?2)",
        rusqlite::params![name, color],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Faculty {
        id: FacultyId::new(conn.last_insert_rowid()),
        name: name.to_string(),
        color: color.to_string(),
    })
}

/// Get a faculty by ID.
pub fn get_faculty(conn: &Connection, id: FacultyId) -> Result<Option<Faculty>> {
    let q = format!("SELECT {COLS} FROM faculties WHERE id = ?1");
    let result = conn.query_row(&q, [id.value()], Faculty::from_row);
    match result {
        Ok(f) => Ok(Some(f)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Update a faculty's name and color. Returns the updated row, or `None`
/// when no faculty with that ID exists.
pub fn update_faculty(
    conn: &Connection,
    id: FacultyId,
    name: &str,
    color: &str,
) -> Result<Option<Faculty>> {
    let n = conn
        .execute(
            "UPDATE faculties SET name = ?2, color = ?3 WHERE id = ?1",
            rusqlite::params![id.value(), name, color],
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if n == 0 {
        return Ok(None);
    }
    get_faculty(conn, id)
}

/// Delete a faculty by ID. Returns `true` when a row was removed.
pub fn delete_faculty(conn: &Connection, id: FacultyId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM faculties WHERE id = ?1", [id.value()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// List all faculties ordered by ID.
pub fn list_faculties(conn: &Connection) -> Result<Vec<Faculty>> {
    let q = format!("SELECT {COLS} FROM faculties ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Faculty::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Find faculties whose name or color matches `term` case-insensitively.
pub fn search_faculties(conn: &Connection, term: &str) -> Result<Vec<Faculty>> {
    let q = format!(
        "SELECT {COLS} FROM faculties
         WHERE name = ?1 COLLATE NOCASE OR color = ?1 COLLATE NOCASE
         ORDER BY id ASC"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([term], Faculty::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn create_get_update_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let f = create_faculty(&conn, "Gryffindor", "red").unwrap();
        assert_eq!(get_faculty(&conn, f.id).unwrap().unwrap().name, "Gryffindor");

        let updated = update_faculty(&conn, f.id, "Ravenclaw", "blue")
            .unwrap()
            .unwrap();
        assert_eq!(updated.color, "blue");

        assert!(delete_faculty(&conn, f.id).unwrap());
        assert!(get_faculty(&conn, f.id).unwrap().is_none());
        assert!(!delete_faculty(&conn, f.id).unwrap());
    }

    #[test]
    fn update_missing_returns_none() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let missing = update_faculty(&conn, FacultyId::new(99), "X", "y").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn search_matches_name_or_color_ignoring_case() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_faculty(&conn, "Slytherin", "green").unwrap();
        create_faculty(&conn, "Hufflepuff", "yellow").unwrap();

        assert_eq!(search_faculties(&conn, "SLYTHERIN").unwrap().len(), 1);
        assert_eq!(search_faculties(&conn, "Yellow").unwrap().len(), 1);
        assert!(search_faculties(&conn, "purple").unwrap().is_empty());
    }
}
