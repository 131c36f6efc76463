use super::{check_key, PersistenceStore, StoreError};
use log::*;
use serde_json::{Map, Value};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Store persisting every key into one JSON object on disk. The whole
/// object is rewritten on each write.
///
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Open the store at `path`, loading its contents if the file exists.
    ///
    pub fn open(path: impl AsRef<Path>) -> Result<FileStore, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
            if contents.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?
            }
        } else {
            Map::new()
        };
        debug!("Opened store {} with {} keys", path.display(), values.len());
        Ok(FileStore { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_error = |e: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut file = fs::File::create(&self.path).map_err(io_error)?;
        write!(file, "{}", content).map_err(io_error)?;
        file.flush().map_err(io_error)?;
        Ok(())
    }
}

impl PersistenceStore for FileStore {
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        check_key(key)?;
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        check_key(key)?;
        Ok(self.values.get(key).cloned())
    }
}
