//! Page cache trait and error types
//!
//! This module defines the trait interface for page cache backends and
//! associated error types.

use crate::record::DocumentId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during page cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("No cached page for document {0}")]
    Miss(DocumentId),

    #[error("Failed to read cached page for document {id} at {path}: {source}")]
    Read {
        id: DocumentId,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cached page for document {id} at {path}: {source}")]
    Write {
        id: DocumentId,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cached page for document {id} at {path} is not valid UTF-8")]
    Corrupt { id: DocumentId, path: PathBuf },

    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for page cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for page cache backends
///
/// The cache is append-only: an entry is written once, after the first
/// successful fetch of a document, and only read afterwards. There is no
/// eviction.
pub trait PageCache {
    /// Returns true if an entry exists for `id`
    fn has(&self, id: DocumentId) -> bool;

    /// Reads the cached page for `id`
    ///
    /// Fails with [`CacheError::Miss`] if no entry exists.
    fn get(&self, id: DocumentId) -> CacheResult<String>;

    /// Stores the page for `id`
    ///
    /// The entry must be durable before this returns. A write failure is
    /// reported to the caller and must never be swallowed.
    fn put(&mut self, id: DocumentId, content: &str) -> CacheResult<()>;
}
