//! Persistent vertex store
//!
//! One RocksDB record per vertex, keyed by the raw id bytes. Values are
//! self-describing JSON documents so records round-trip losslessly across
//! restarts and schema additions. No auxiliary indexes are kept; tip and
//! child queries recompute over a full scan.

use crate::error::{DagError, Result};
use crate::vertex::Vertex;
use rocksdb::{IteratorMode, Options, DB};
use std::path::Path;

/// RocksDB-backed vertex store
///
/// The handle is `Send + Sync`; dropping it closes the database.
pub struct Store {
    db: DB,
}

impl Store {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path)
            .map_err(|e| DagError::Storage(format!("failed to open database: {}", e)))?;

        Ok(Store { db })
    }

    /// Store a vertex, overwriting any existing record with the same id
    pub fn put(&self, vertex: &Vertex) -> Result<()> {
        let value = serde_json::to_vec(vertex)?;
        self.db.put(vertex.id.as_bytes(), value)?;
        Ok(())
    }

    /// Fetch a vertex by id; absent is not an error
    pub fn get(&self, id: &str) -> Result<Option<Vertex>> {
        match self.db.get(id.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Delete a vertex record; deleting an absent key is a no-op
    pub fn delete(&self, id: &str) -> Result<()> {
        self.db.delete(id.as_bytes())?;
        Ok(())
    }

    /// Lazily iterate over all stored records, decoding each
    pub fn iter(&self) -> impl Iterator<Item = Result<Vertex>> + '_ {
        self.db.iterator(IteratorMode::Start).map(|item| {
            let (_, value) = item?;
            Ok(serde_json::from_slice(&value)?)
        })
    }

    /// Number of stored vertices
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        for item in self.db.iterator(IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| DagError::Storage(format!("flush error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn vertex(id: &str) -> Vertex {
        Vertex {
            id: id.to_string(),
            data: "payload".to_string(),
            parents: vec![],
            weight: 1.0,
            cumulative_weight: 1.0,
        }
    }

    #[test]
    fn test_put_and_get() {
        let (store, _temp_dir) = create_test_store();

        store.put(&vertex("v1")).unwrap();

        let retrieved = store.get("v1").unwrap().unwrap();
        assert_eq!(retrieved.id, "v1");
        assert_eq!(retrieved.data, "payload");
    }

    #[test]
    fn test_get_absent_is_none() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _temp_dir) = create_test_store();

        store.put(&vertex("v1")).unwrap();
        store.delete("v1").unwrap();
        assert!(store.get("v1").unwrap().is_none());

        // Deleting an absent key is not an error.
        store.delete("v1").unwrap();
        store.delete("never-existed").unwrap();
    }

    #[test]
    fn test_iter_and_count() {
        let (store, _temp_dir) = create_test_store();

        store.put(&vertex("v1")).unwrap();
        store.put(&vertex("v2")).unwrap();
        store.put(&vertex("v3")).unwrap();

        assert_eq!(store.count().unwrap(), 3);

        let mut ids: Vec<String> = store.iter().map(|v| v.unwrap().id).collect();
        ids.sort();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_upsert_overwrites() {
        let (store, _temp_dir) = create_test_store();

        store.put(&vertex("v1")).unwrap();
        let mut updated = vertex("v1");
        updated.cumulative_weight = 5.0;
        store.put(&updated).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let retrieved = store.get("v1").unwrap().unwrap();
        assert_eq!(retrieved.cumulative_weight, 5.0);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path();

        {
            let store = Store::open(path).unwrap();
            store.put(&vertex("persistent")).unwrap();
            store.flush().unwrap();
        }

        {
            let store = Store::open(path).unwrap();
            let retrieved = store.get("persistent").unwrap().unwrap();
            assert_eq!(retrieved.id, "persistent");
        }
    }
}
