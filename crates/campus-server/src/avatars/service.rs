//! Upload orchestration: file store plus database row.
//!
//! An upload writes the bytes to disk first, then upserts the avatar row.
//! The row is the source of truth for existence; a database failure after a
//! successful file write leaves the two copies out of sync, which is
//! surfaced to the caller and logged for operators rather than rolled back.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use campus_core::{Error, Result, StudentId};
use campus_db::models::Avatar;
use campus_db::pool::{self, DbPool};
use campus_db::queries::{avatars, students};

use super::store::{extension_of, AvatarStore};

/// Orchestrates avatar uploads against the file store and the database.
pub struct AvatarService {
    store: AvatarStore,
    pool: DbPool,
    /// Per-student exclusion so concurrent uploads for the same student
    /// cannot interleave the file write and the row upsert.
    locks: DashMap<StudentId, Arc<Mutex<()>>>,
}

impl AvatarService {
    pub fn new(store: AvatarStore, pool: DbPool) -> Self {
        Self {
            store,
            pool,
            locks: DashMap::new(),
        }
    }

    /// Upload an avatar for a student.
    ///
    /// Resolves the student, derives the extension from `file_name`, writes
    /// the file, and upserts the avatar row. Errors surface unchanged; no
    /// internal retry is attempted since the byte source has already been
    /// consumed once.
    pub async fn upload(
        &self,
        student_id: StudentId,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<Avatar> {
        let lock = self.locks.entry(student_id).or_default().clone();
        let _guard = lock.lock().await;

        let conn = pool::get_conn(&self.pool)?;

        let student = students::get_student(&conn, student_id)?
            .ok_or_else(|| Error::not_found("student", student_id))?;

        let extension = extension_of(file_name)?;

        if let Some(existing) = avatars::find_by_student(&conn, student_id)? {
            let new_path = self.store.path_for(student_id, extension);
            if existing.file_path != new_path.to_string_lossy() {
                tracing::debug!(
                    student = %student_id,
                    old = %existing.file_path,
                    new = %new_path.display(),
                    "Avatar extension changed; previous file is orphaned on disk"
                );
            }
        }

        let path = self.store.write(student_id, extension, bytes)?;
        let path_str = path.to_string_lossy().into_owned();

        match avatars::upsert(
            &conn,
            student_id,
            &path_str,
            content_type,
            bytes.len() as i64,
            bytes,
        ) {
            Ok(avatar) => {
                tracing::info!(
                    student = %student.name,
                    path = %path.display(),
                    size = bytes.len(),
                    "Avatar uploaded"
                );
                Ok(avatar)
            }
            Err(e) => {
                tracing::warn!(
                    student = %student_id,
                    path = %path.display(),
                    "Avatar file was written but the database update failed; \
                     file and row now disagree until the next successful upload: {e}"
                );
                Err(e)
            }
        }
    }
}
