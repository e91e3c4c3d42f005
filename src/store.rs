//! Per-user debt records.

use crate::debt::{Debt, DebtRecord};
use crate::error::{StoreError, StoreResult};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// CRUD over debts owned by users. Debts are validated before they are written.
pub trait DebtStore {
    fn create(&mut self, user_id: &str, debt: Debt) -> StoreResult<DebtRecord>;

    /// All debts belonging to `user_id`, in creation order.
    fn list(&self, user_id: &str) -> StoreResult<Vec<DebtRecord>>;

    fn get(&self, id: u64) -> StoreResult<DebtRecord>;

    fn update(&mut self, id: u64, debt: Debt) -> StoreResult<DebtRecord>;

    fn delete(&mut self, id: u64) -> StoreResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: u64,
    records: Vec<DebtRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: u64) -> StoreResult<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl DebtStore for MemoryStore {
    fn create(&mut self, user_id: &str, debt: Debt) -> StoreResult<DebtRecord> {
        debt.validate()?;
        self.next_id += 1;
        let record = DebtRecord {
            id: self.next_id,
            user_id: user_id.to_string(),
            debt,
        };
        self.records.push(record.clone());
        Ok(record)
    }

    fn list(&self, user_id: &str) -> StoreResult<Vec<DebtRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get(&self, id: u64) -> StoreResult<DebtRecord> {
        let idx = self.position(id)?;
        Ok(self.records[idx].clone())
    }

    fn update(&mut self, id: u64, debt: Debt) -> StoreResult<DebtRecord> {
        debt.validate()?;
        let idx = self.position(id)?;
        self.records[idx].debt = debt;
        Ok(self.records[idx].clone())
    }

    fn delete(&mut self, id: u64) -> StoreResult<()> {
        let idx = self.position(id)?;
        self.records.remove(idx);
        Ok(())
    }
}

/// A [`MemoryStore`] mirrored to a JSON file, rewritten after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|err| {
                error!("could not parse {}: {}", path.display(), err);
                StoreError::from(err)
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("{} does not exist yet, starting empty", path.display());
                MemoryStore::new()
            }
            Err(err) => {
                error!("could not read {}: {}", path.display(), err);
                return Err(err.into());
            }
        };
        debug!(
            "opened {} with {} records",
            path.display(),
            inner.records.len()
        );
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> StoreResult<()> {
        let text = serde_json::to_string_pretty(&self.inner)?;
        fs::write(&self.path, text).map_err(|err| {
            error!("could not write {}: {}", self.path.display(), err);
            StoreError::from(err)
        })
    }
}

impl DebtStore for JsonFileStore {
    fn create(&mut self, user_id: &str, debt: Debt) -> StoreResult<DebtRecord> {
        let record = self.inner.create(user_id, debt)?;
        self.save()?;
        Ok(record)
    }

    fn list(&self, user_id: &str) -> StoreResult<Vec<DebtRecord>> {
        self.inner.list(user_id)
    }

    fn get(&self, id: u64) -> StoreResult<DebtRecord> {
        self.inner.get(id)
    }

    fn update(&mut self, id: u64, debt: Debt) -> StoreResult<DebtRecord> {
        let record = self.inner.update(id, debt)?;
        self.save()?;
        Ok(record)
    }

    fn delete(&mut self, id: u64) -> StoreResult<()> {
        self.inner.delete(id)?;
        self.save()
    }
}
