//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use campus_core::{AvatarId, FacultyId, StudentId};

// ---------------------------------------------------------------------------
// Faculty
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub color: String,
}

impl Faculty {
    /// Build from a row selected as: id, name, color
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: FacultyId::new(row.get(0)?),
            name: row.get(1)?,
            color: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub age: i32,
    pub faculty_id: Option<FacultyId>,
}

impl Student {
    /// Build from a row selected as: id, name, age, faculty_id
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let faculty_id: Option<i64> = row.get(3)?;
        Ok(Self {
            id: StudentId::new(row.get(0)?),
            name: row.get(1)?,
            age: row.get(2)?,
            faculty_id: faculty_id.map(FacultyId::new),
        })
    }
}

// ---------------------------------------------------------------------------
// Avatar
// ---------------------------------------------------------------------------

/// The stored avatar for exactly one student: row metadata plus a verbatim
/// copy of the uploaded bytes. A second copy of the bytes lives on disk at
/// `file_path`.
#[derive(Debug, Clone)]
pub struct Avatar {
    pub id: AvatarId,
    pub student_id: StudentId,
    pub file_path: String,
    pub media_type: String,
    pub file_size: i64,
    pub data: Vec<u8>,
}

impl Avatar {
    /// Build from a row selected as:
    /// id, student_id, file_path, media_type, file_size, data
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: AvatarId::new(row.get(0)?),
            student_id: StudentId::new(row.get(1)?),
            file_path: row.get(2)?,
            media_type: row.get(3)?,
            file_size: row.get(4)?,
            data: row.get(5)?,
        })
    }
}
