//! Student CRUD and derived query operations.

use campus_core::{Error, FacultyId, Result, StudentId};
use rusqlite::Connection;

use crate::models::Student;

const COLS: &str = "id, name, age, faculty_id";

/// Create a new student.
pub fn create_student(
    conn: &Connection,
    name: &str,
    age: i32,
    faculty_id: Option<FacultyId>,
) -> Result<Student> {
    conn.execute(
        "INSERT INTO students (name, age, faculty_id) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, age, faculty_id.map(|f| f.value())],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Student {
        id: StudentId::new(conn.last_insert_rowid()),
        name: name.to_string(),
        age,
        faculty_id,
    })
}

/// Get a student by ID.
pub fn get_student(conn: &Connection, id: StudentId) -> Result<Option<Student>> {
    let q = format!("SELECT {COLS} FROM students WHERE id = ?1");
    let result = conn.query_row(&q, [id.value()], Student::from_row);
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Update a student's fields. Returns the updated row, or `None` when no
/// student with that ID exists.
pub fn update_student(
    conn: &Connection,
    id: StudentId,
    name: &str,
    age: i32,
    faculty_id: Option<FacultyId>,
) -> Result<Option<Student>> {
    let n = conn
        .execute(
            "UPDATE students SET name = ?2, age = ?3, faculty_id = ?4 WHERE id = ?1",
            rusqlite::params![id.value(), name, age, faculty_id.map(|f| f.value())],
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if n == 0 {
        return Ok(None);
    }
    get_student(conn, id)
}

/// Delete a student by ID. Returns `true` when a row was removed.
///
/// The avatar row (if any) goes with the student via ON DELETE CASCADE;
/// the on-disk file copy is left behind.
pub fn delete_student(conn: &Connection, id: StudentId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM students WHERE id = ?1", [id.value()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// List all students ordered by ID.
pub fn list_students(conn: &Connection) -> Result<Vec<Student>> {
    let q = format!("SELECT {COLS} FROM students ORDER BY id ASC");
    collect_students(conn, &q, [])
}

/// List all students of an exact age.
pub fn list_students_by_age(conn: &Connection, age: i32) -> Result<Vec<Student>> {
    let q = format!("SELECT {COLS} FROM students WHERE age = ?1 ORDER BY id ASC");
    collect_students(conn, &q, rusqlite::params![age])
}

/// List all students whose age falls in `[min, max]` inclusive.
pub fn list_students_by_age_between(
    conn: &Connection,
    min: i32,
    max: i32,
) -> Result<Vec<Student>> {
    let q = format!("SELECT {COLS} FROM students WHERE age BETWEEN ?1 AND ?2 ORDER BY id ASC");
    collect_students(conn, &q, rusqlite::params![min, max])
}

/// List all students belonging to a faculty.
pub fn list_students_by_faculty(
    conn: &Connection,
    faculty_id: FacultyId,
) -> Result<Vec<Student>> {
    let q = format!("SELECT {COLS} FROM students WHERE faculty_id = ?1 ORDER BY id ASC");
    collect_students(conn, &q, rusqlite::params![faculty_id.value()])
}

/// Find a single student by name, case-insensitively.
pub fn find_student_by_name(conn: &Connection, name: &str) -> Result<Option<Student>> {
    let q = format!("SELECT {COLS} FROM students WHERE name = ?1 COLLATE NOCASE LIMIT 1");
    let result = conn.query_row(&q, [name], Student::from_row);
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Total number of students.
pub fn count_students(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Average age across all students; `None` when there are no students.
pub fn average_age(conn: &Connection) -> Result<Option<f64>> {
    conn.query_row("SELECT AVG(age) FROM students", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// The most recently enrolled students, newest first (highest ID).
pub fn last_enrolled(conn: &Connection, limit: i64) -> Result<Vec<Student>> {
    let q = format!("SELECT {COLS} FROM students ORDER BY id DESC LIMIT ?1");
    collect_students(conn, &q, rusqlite::params![limit])
}

/// Uppercased, alphabetically sorted names of students whose name starts
/// with `prefix` (case-insensitive).
pub fn student_names_with_prefix(conn: &Connection, prefix: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT UPPER(name) FROM students
             WHERE name LIKE ?1 || '%'
             ORDER BY UPPER(name) ASC",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([prefix], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

fn collect_students(
    conn: &Connection,
    query: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Student>> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(params, Student::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::faculties;

    #[test]
    fn create_get_update_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let s = create_student(&conn, "Harry", 17, None).unwrap();
        assert_eq!(get_student(&conn, s.id).unwrap().unwrap().age, 17);

        let updated = update_student(&conn, s.id, "Harry", 18, None)
            .unwrap()
            .unwrap();
        assert_eq!(updated.age, 18);

        assert!(delete_student(&conn, s.id).unwrap());
        assert!(get_student(&conn, s.id).unwrap().is_none());
    }

    #[test]
    fn age_filters() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_student(&conn, "Ann", 18, None).unwrap();
        create_student(&conn, "Ben", 20, None).unwrap();
        create_student(&conn, "Cat", 22, None).unwrap();

        assert_eq!(list_students_by_age(&conn, 20).unwrap().len(), 1);
        let range = list_students_by_age_between(&conn, 19, 23).unwrap();
        assert_eq!(range.len(), 2);
        assert!(range.iter().all(|s| s.age >= 19 && s.age <= 23));
    }

    #[test]
    fn faculty_membership() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let f = faculties::create_faculty(&conn, "Sciences", "blue").unwrap();
        create_student(&conn, "Dora", 19, Some(f.id)).unwrap();
        create_student(&conn, "Eve", 21, None).unwrap();

        let roster = list_students_by_faculty(&conn, f.id).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Dora");
    }

    #[test]
    fn find_by_name_ignores_case() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_student(&conn, "Fleur", 18, None).unwrap();
        assert!(find_student_by_name(&conn, "FLEUR").unwrap().is_some());
        assert!(find_student_by_name(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn stats() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert_eq!(count_students(&conn).unwrap(), 0);
        assert!(average_age(&conn).unwrap().is_none());

        create_student(&conn, "Gil", 18, None).unwrap();
        create_student(&conn, "Hal", 22, None).unwrap();

        assert_eq!(count_students(&conn).unwrap(), 2);
        assert_eq!(average_age(&conn).unwrap(), Some(20.0));
    }

    #[test]
    fn last_enrolled_is_id_descending() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        for name in ["a", "b", "c", "d"] {
            create_student(&conn, name, 20, None).unwrap();
        }

        let latest = last_enrolled(&conn, 2).unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].name, "d");
        assert_eq!(latest[1].name, "c");
    }

    #[test]
    fn names_with_prefix_uppercased_and_sorted() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_student(&conn, "astoria", 18, None).unwrap();
        create_student(&conn, "Albus", 11, None).unwrap();
        create_student(&conn, "Ben", 20, None).unwrap();

        let names = student_names_with_prefix(&conn, "a").unwrap();
        assert_eq!(names, vec!["ALBUS".to_string(), "ASTORIA".to_string()]);
    }
}
