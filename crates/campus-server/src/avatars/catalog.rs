//! Read path over the avatar collection.

use campus_core::{Error, Result, StudentId};
use campus_db::models::Avatar;
use campus_db::pool::{self, DbPool};
use campus_db::queries::avatars;

/// Read-only access to avatar records: single lookup and offset paging.
///
/// Every call re-queries the database; there is no caching, so a fresh page
/// may reflect writes that happened between calls.
pub struct AvatarCatalog {
    pool: DbPool,
}

impl AvatarCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch the avatar record for a student.
    pub fn get(&self, student_id: StudentId) -> Result<Avatar> {
        let conn = pool::get_conn(&self.pool)?;
        avatars::find_by_student(&conn, student_id)?
            .ok_or_else(|| Error::not_found("avatar", student_id))
    }

    /// Fetch one page of avatar records ordered by record id.
    ///
    /// `page_number` and `page_size` are 1-indexed and positive; anything
    /// below 1 is a caller error, not a clamped empty page.
    pub fn list_page(&self, page_number: i64, page_size: i64) -> Result<Vec<Avatar>> {
        if page_number < 1 {
            return Err(Error::Validation(format!(
                "page number must be at least 1, got {page_number}"
            )));
        }
        if page_size < 1 {
            return Err(Error::Validation(format!(
                "page size must be at least 1, got {page_size}"
            )));
        }

        // page_number and page_size arrive unclamped from the query
        // string; the offset multiplication can exceed i64.
        let offset = (page_number - 1)
            .checked_mul(page_size)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "page window out of range: page {page_number} of size {page_size}"
                ))
            })?;
        let conn = pool::get_conn(&self.pool)?;
        avatars::page(&conn, offset, page_size)
    }
}
