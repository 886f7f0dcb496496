use crate::error::{Error, Result};
use crate::io::ByteSource;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A file mapped read-only into memory.
///
/// Workers read disjoint ranges of the mapping directly; nothing is copied.
#[derive(Debug)]
pub struct MappedFile {
    path: PathBuf,
    // `None` for empty files, which cannot be mapped on every platform.
    map: Option<Mmap>,
}

impl MappedFile {
    /// Open and map `path`.
    ///
    /// # Errors
    /// [`Error::SourceRead`] if the file cannot be opened, inspected or mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::source_read(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| Error::source_read(path, e))?
            .len();

        let map = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and lives as long as `self`; the
            // input is expected not to be truncated while a run is in progress.
            let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::source_read(path, e))?;
            Some(map)
        };

        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |m| m.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteSource for MappedFile {
    fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}
