//! Directory-backed page cache
//!
//! One file per document, named `<id>.html`. Writes go to a temporary sibling
//! first and are renamed into place after `sync_all`, so an interrupted write
//! never leaves a partial entry behind.

use crate::record::DocumentId;
use crate::storage::traits::{CacheError, CacheResult, PageCache};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Page cache stored as plain files in a directory
#[derive(Debug, Clone)]
pub struct DiskPageCache {
    dir: PathBuf,
}

impl DiskPageCache {
    /// Opens the cache rooted at `dir`, creating the directory if needed
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding the cached pages
    ///
    /// # Returns
    ///
    /// * `Ok(DiskPageCache)` - The directory exists and is usable
    /// * `Err(CacheError)` - The directory could not be created
    pub fn open(dir: &Path) -> CacheResult<Self> {
        fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The directory this cache lives in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache entry for `id`
    pub fn entry_path(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!("{}.html", id))
    }

    fn temp_path(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!(".{}.html.partial", id))
    }
}

impl PageCache for DiskPageCache {
    fn has(&self, id: DocumentId) -> bool {
        self.entry_path(id).is_file()
    }

    fn get(&self, id: DocumentId) -> CacheResult<String> {
        let path = self.entry_path(id);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(CacheError::Miss(id)),
            Err(source) => return Err(CacheError::Read { id, path, source }),
        };

        String::from_utf8(bytes).map_err(|_| CacheError::Corrupt { id, path })
    }

    fn put(&mut self, id: DocumentId, content: &str) -> CacheResult<()> {
        let path = self.entry_path(id);
        let temp = self.temp_path(id);

        let write_result = (|| -> std::io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp, &path)
        })();

        write_result.map_err(|source| {
            let _ = fs::remove_file(&temp);
            CacheError::Write {
                id,
                path: path.clone(),
                source,
            }
        })?;

        tracing::trace!("Cached document {} at {}", id, path.display());
        Ok(())
    }
}
