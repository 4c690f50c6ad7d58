//! Storage module for cached abstract pages
//!
//! This module keeps the raw page content of every successfully fetched
//! document on local disk so that later runs over the same IDs never hit the
//! network again:
//! - `PageCache`: the trait the fetcher talks to
//! - `DiskPageCache`: one file per document ID under a configured directory

mod disk;
mod traits;

pub use disk::DiskPageCache;
pub use traits::{CacheError, CacheResult, PageCache};

use std::path::Path;

/// Opens the page cache at the configured directory
///
/// # Arguments
///
/// * `dir` - Directory holding one `<id>.html` file per cached document
///
/// # Returns
///
/// * `Ok(DiskPageCache)` - Successfully opened cache
/// * `Err(CacheError)` - The directory could not be created
pub fn open_cache(dir: &Path) -> CacheResult<DiskPageCache> {
    DiskPageCache::open(dir)
}
