//! Single-file JSON documents
//!
//! Global data that is not partitioned by month: the split configuration,
//! category lists and budget settings.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerResult;

use super::file_io::{read_json, write_json_atomic};
use super::records::acquire;

pub struct JsonDocument<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _marker: PhantomData<T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: PathBuf, lock: Arc<Mutex<()>>) -> Self {
        Self {
            path,
            lock,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents; the default value when the file is missing
    pub fn load(&self) -> LedgerResult<T> {
        read_json(&self.path)
    }

    pub fn save(&self, value: &T) -> LedgerResult<()> {
        let _guard = acquire(&self.lock)?;
        write_json_atomic(&self.path, value)
    }

    /// Read, modify and write back under the write lock
    ///
    /// The closure's error aborts the write.
    pub fn update<R, F>(&self, f: F) -> LedgerResult<R>
    where
        F: FnOnce(&mut T) -> LedgerResult<R>,
    {
        let _guard = acquire(&self.lock)?;
        let mut value = self.load()?;
        let result = f(&mut value)?;
        write_json_atomic(&self.path, &value)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::models::SplitConfig;
    use tempfile::TempDir;

    fn document() -> (JsonDocument<SplitConfig>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let doc = JsonDocument::new(temp_dir.path().join("config.json"), Arc::new(Mutex::new(())));
        (doc, temp_dir)
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (doc, _temp) = document();
        assert_eq!(doc.load().unwrap(), SplitConfig::default());
        assert!(!doc.path().exists());
    }

    #[test]
    fn test_update_persists() {
        let (doc, _temp) = document();
        let added = doc
            .update(|config| {
                config.persons[0] = "Alice".into();
                Ok(config.persons.len())
            })
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(doc.load().unwrap().persons[0], "Alice");
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let (doc, _temp) = document();
        doc.save(&SplitConfig::equal("Alice", "Bob")).unwrap();

        let result: LedgerResult<()> = doc.update(|config| {
            config.persons.clear();
            Err(LedgerError::validation("nope"))
        });
        assert!(result.is_err());
        assert_eq!(doc.load().unwrap().persons, vec!["Alice", "Bob"]);
    }
}
