//! `.part` file written during a download and renamed into place on success.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::StoreError;

/// Temporary file prefix. Canonical names never start with a dot, so a temp
/// path can never be another item's final path.
pub const TEMP_PREFIX: &str = ".";

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file, next to the final one (e.g. `a.jpg` → `.a.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(TEMP_PREFIX);
    if let Some(file_name) = final_path.file_name() {
        name.push(file_name);
    }
    name.push(TEMP_SUFFIX);
    final_path.with_file_name(name)
}

/// In-progress download. Removed on drop unless `commit` succeeded, so a failed
/// transfer never leaves anything at the final path.
pub struct PartFile {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl PartFile {
    /// Create (or truncate a stale) `<final_path>.part`.
    pub fn create(final_path: &Path) -> Result<Self, StoreError> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|source| StoreError::Create {
                path: temp_path.clone(),
                source,
            })?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and rename onto the final path. Returns the byte count.
    ///
    /// On any error the part file is removed.
    pub fn commit(mut self) -> Result<u64, StoreError> {
        let len = self.sync()?;
        // Close before rename; from here on Drop no longer owns the temp file.
        self.file = None;

        if let Err(source) = std::fs::rename(&self.temp_path, &self.final_path) {
            let _ = std::fs::remove_file(&self.temp_path);
            return Err(StoreError::Rename {
                from: self.temp_path.clone(),
                to: self.final_path.clone(),
                source,
            });
        }
        Ok(len)
    }

    /// Flush buffered bytes and fsync. The writer stays in place, so a failure
    /// here still leaves cleanup to Drop.
    fn sync(&mut self) -> Result<u64, StoreError> {
        let temp_path = &self.temp_path;
        let write_err = |source| StoreError::Write {
            path: temp_path.clone(),
            source,
        };
        let Some(writer) = self.file.as_mut() else {
            return Err(StoreError::Closed(temp_path.clone()));
        };
        writer.flush().map_err(write_err)?;
        let file = writer.get_ref();
        file.sync_all().map_err(write_err)?;
        Ok(file.metadata().map_err(write_err)?.len())
    }
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(f) => f.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "part file closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::debug!(path = %self.temp_path.display(), "could not remove part file: {}", e);
                }
            }
        }
    }
}
