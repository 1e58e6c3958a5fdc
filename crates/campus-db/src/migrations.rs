//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use campus_core::{Error, Result};
use rusqlite::Connection;

/// V1: initial schema -- faculties, students, and avatar records.
///
/// `avatars.student_id` is UNIQUE: at most one live avatar row per student.
/// Deleting a student cascades to its avatar row; the on-disk file copy is
/// left behind (documented operational gap).
const V1_INITIAL: &str = r#"
CREATE TABLE faculties (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    color TEXT NOT NULL
);

CREATE TABLE students (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    age        INTEGER NOT NULL,
    faculty_id INTEGER REFERENCES faculties(id) ON DELETE SET NULL
);

CREATE TABLE avatars (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL UNIQUE REFERENCES students(id) ON DELETE CASCADE,
    file_path  TEXT NOT NULL,
    media_type TEXT NOT NULL,
    file_size  INTEGER NOT NULL,
    data       BLOB NOT NULL
);

CREATE INDEX idx_students_faculty ON students(faculty_id);
"#;

/// V2: indexes for the derived student queries (age filters, name search).
const V2_STUDENT_INDEXES: &str = r#"
CREATE INDEX idx_students_age  ON students(age);
CREATE INDEX idx_students_name ON students(name);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL), (2, V2_STUDENT_INDEXES)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // second call is a no-op
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        let tables = ["faculties", "students", "avatars", "schema_migrations"];
        for t in &tables {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                    [t],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "table {t} should exist");
        }
    }

    #[test]
    fn test_student_id_is_unique_in_avatars() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        conn.execute("INSERT INTO students (name, age) VALUES ('Ann', 20)", [])
            .unwrap();
        conn.execute(
            "INSERT INTO avatars (student_id, file_path, media_type, file_size, data)
             VALUES (1, '/a/1.png', 'image/png', 3, x'010203')",
            [],
        )
        .unwrap();

        let second = conn.execute(
            "INSERT INTO avatars (student_id, file_path, media_type, file_size, data)
             VALUES (1, '/a/1.jpg', 'image/jpeg', 3, x'040506')",
            [],
        );
        assert!(second.is_err(), "duplicate student_id must be rejected");
    }
}
