//! Filesystem-level avatar storage.
//!
//! One regular file per student at `<root>/<student_id>.<extension>`. The
//! path is deterministic, so repeated uploads for the same student and
//! extension overwrite the same file; the extension follows whatever file
//! name accompanied the most recent upload.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use campus_core::{Error, Result, StudentId};

/// Derive the file extension from an uploaded file name.
///
/// Takes the substring after the last `.`; a name with no dot, an empty
/// extension, or an extension carrying path separators is rejected so the
/// stored path can never escape the avatar root.
pub fn extension_of(file_name: &str) -> Result<&str> {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return Err(Error::InvalidFileName(file_name.to_string()));
    };
    if extension.is_empty()
        || extension.contains('/')
        || extension.contains('\\')
        || extension.contains("..")
    {
        return Err(Error::InvalidFileName(file_name.to_string()));
    }
    Ok(extension)
}

/// Filesystem store for avatar byte streams.
///
/// Holds no in-memory state; the only side effect of [`write`](Self::write)
/// is the file tree under `root`.
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The deterministic path for a student's avatar with the given
    /// extension.
    pub fn path_for(&self, student_id: StudentId, extension: &str) -> PathBuf {
        self.root.join(format!("{student_id}.{extension}"))
    }

    /// Write `bytes` to the student's avatar path, replacing any prior file.
    ///
    /// The old file is removed first and the new one opened in
    /// exclusive-create mode; if the write fails partway, the partial output
    /// is removed so no bytes are ever visible at the path unless the write
    /// completed.
    pub fn write(&self, student_id: StudentId, extension: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;

        let path = self.path_for(student_id, extension);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        if let Err(e) = write_exclusive(&path, bytes) {
            let _ = std::fs::remove_file(&path);
            return Err(Error::Io { source: e });
        }

        Ok(path)
    }
}

fn write_exclusive(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
