//! Run configuration.
//!
//! The only tunables of an aggregation run are how many workers it uses and
//! how input is chunked. Values can come from code, a JSON file, or the CLI.
//!
//! ```
//! use ironbrc::RunConfig;
//!
//! let cfg: RunConfig = serde_json::from_str(r#"{ "worker_count": 4 }"#)?;
//! assert_eq!(cfg.workers(), 4);
//! assert_eq!(cfg.chunk_size_hint, RunConfig::DEFAULT_CHUNK_SIZE);
//! # Ok::<(), serde_json::Error>(())
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads; `None` uses every available processor.
    pub worker_count: Option<usize>,
    /// Bytes read per chunk when streaming a non-mappable input. Larger chunks
    /// cost memory, smaller ones balance load better.
    pub chunk_size_hint: usize,
    /// Partitions handed out per worker for a mapped input.
    pub partitions_per_worker: usize,
    /// Run on the calling thread only.
    pub sequential: bool,
    /// Buffer values per station and reduce them in bulk instead of folding
    /// them one by one.
    pub buffered: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            chunk_size_hint: Self::DEFAULT_CHUNK_SIZE,
            partitions_per_worker: 1,
            sequential: false,
            buffered: false,
        }
    }
}

impl RunConfig {
    pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024 * 1024;
    /// Largest accepted `chunk_size_hint`.
    pub const MAX_CHUNK_SIZE: usize = 1 << 30;
    /// Largest accepted `partitions_per_worker`.
    pub const MAX_PARTITIONS_PER_WORKER: usize = 1024;

    /// Load a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    /// [`Error::SourceRead`] if the file cannot be read, [`Error::InvalidConfig`]
    /// if it does not parse or fails [`RunConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::source_read(path, e))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Effective worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        if self.sequential {
            1
        } else {
            self.worker_count.unwrap_or_else(num_cpus::get).max(1)
        }
    }

    /// Effective partition count for a mapped input.
    #[must_use]
    pub fn partitions(&self) -> usize {
        self.workers()
            .saturating_mul(self.partitions_per_worker.max(1))
    }

    /// # Errors
    /// [`Error::InvalidConfig`] for a zero worker count, or a chunk size or
    /// partition multiplier that is zero or above its maximum.
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == Some(0) {
            return Err(Error::InvalidConfig("worker_count must be at least 1".into()));
        }
        if !(1..=Self::MAX_CHUNK_SIZE).contains(&self.chunk_size_hint) {
            return Err(Error::InvalidConfig(format!(
                "chunk_size_hint must be between 1 and {} bytes",
                Self::MAX_CHUNK_SIZE
            )));
        }
        if !(1..=Self::MAX_PARTITIONS_PER_WORKER).contains(&self.partitions_per_worker) {
            return Err(Error::InvalidConfig(format!(
                "partitions_per_worker must be between 1 and {}",
                Self::MAX_PARTITIONS_PER_WORKER
            )));
        }
        Ok(())
    }
}
