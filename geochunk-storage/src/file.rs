//! JSON-on-disk chunk cache.
//!
//! Layout: `<root>/lat_<latitude>/lon_<longitude>/lod_<level_of_detail>.json`,
//! one pretty-printed record per key.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use geochunk_core::{Chunk, ChunkKey};
use tempfile::NamedTempFile;

use crate::{CacheError, CacheRecord, ChunkCache};

pub struct JsonFileCache {
    root: PathBuf,
}

impl JsonFileCache {
    /// Open a cache rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|source| CacheError::Io { path: root.clone(), source })?;
        log::info!("chunk cache at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record path for `key`. Each coordinate is its own path component, so
    /// distinct keys never share a path.
    pub fn path_for(&self, key: &ChunkKey) -> PathBuf {
        self.root
            .join(format!("lat_{}", key.latitude))
            .join(format!("lon_{}", key.longitude))
            .join(format!("lod_{}.json", key.level_of_detail))
    }

    fn write_atomic(path: &Path, record: &CacheRecord) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io { path: path.to_path_buf(), source };

        let parent = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(io_err)?;

        // Uniquely named sibling, so concurrent writers never share a temp
        // file and the rename stays on one filesystem. Removed on drop if any
        // step below fails.
        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            serde_json::to_writer_pretty(&mut writer, record)
                .map_err(|source| CacheError::Serde { path: path.to_path_buf(), source })?;
            writer.flush().map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl ChunkCache for JsonFileCache {
    fn store(&self, chunk: &Chunk) -> Result<(), CacheError> {
        let record = CacheRecord::from_chunk(chunk)?;
        let path = self.path_for(&chunk.key);
        Self::write_atomic(&path, &record)?;
        log::debug!("stored chunk {} -> {}", chunk.key, path.display());
        Ok(())
    }

    fn load(&self, key: &ChunkKey) -> Result<CacheRecord, CacheError> {
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CacheError::NotFound { key: *key });
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CacheError::Serde { path, source })
    }

    fn evict(&self, key: &ChunkKey) -> Result<(), CacheError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("evicted chunk {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}
