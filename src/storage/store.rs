// LedgerStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - Labelled participant keypairs
// - Staking pool state (ledger + bank)

use crate::identity::Keypair;
use crate::pool::{PoolError, StakingPool};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Key prefixes for organizing data
mod keys {
    pub const KEYPAIR_PREFIX: &[u8] = b"identity:keypair:";
    pub const POOL: &[u8] = b"pool:state";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),

    #[error("Label already in use: {0}")]
    LabelExists(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent store for the staking pool and participant keys
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct LedgerStore {
    db: sled::Db,
}

impl LedgerStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        }
    }

    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    // ========================================================================
    // IDENTITY PERSISTENCE
    // ========================================================================

    /// Save a keypair under a label; refuses to overwrite an existing one
    pub fn save_keypair(&self, label: &str, keypair: &Keypair) -> Result<(), StoreError> {
        let key = keypair_key(label);
        let inserted = self
            .db
            .compare_and_swap(&key, None as Option<&[u8]>, Some(keypair.to_bytes()))?;
        if inserted.is_err() {
            return Err(StoreError::LabelExists(label.to_string()));
        }
        debug!(label, address = %keypair.address(), "saved keypair");
        Ok(())
    }

    /// Load a keypair by label
    pub fn load_keypair(&self, label: &str) -> Result<Option<Keypair>, StoreError> {
        match self.get_raw(&keypair_key(label))? {
            Some(bytes) => {
                let keypair = Keypair::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(keypair))
            }
            None => Ok(None),
        }
    }

    /// All keypair labels, sorted
    pub fn labels(&self) -> Result<Vec<String>, StoreError> {
        let mut labels = Vec::new();
        for result in self.db.scan_prefix(keys::KEYPAIR_PREFIX) {
            let (key, _) = result?;
            let label = String::from_utf8_lossy(&key[keys::KEYPAIR_PREFIX.len()..]).into_owned();
            labels.push(label);
        }
        Ok(labels)
    }

    // ========================================================================
    // POOL PERSISTENCE
    // ========================================================================

    /// Save the pool state
    pub fn save_pool(&self, pool: &StakingPool) -> Result<(), StoreError> {
        let bytes = pool
            .to_bytes()
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.put_raw(keys::POOL, &bytes)
    }

    /// Load the pool state
    pub fn load_pool(&self) -> Result<Option<StakingPool>, StoreError> {
        match self.get_raw(keys::POOL)? {
            Some(bytes) => {
                let pool = StakingPool::from_bytes(&bytes)
                    .map_err(|e: PoolError| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(pool))
            }
            None => Ok(None),
        }
    }
}

fn keypair_key(label: &str) -> Vec<u8> {
    [keys::KEYPAIR_PREFIX, label.as_bytes()].concat()
}
