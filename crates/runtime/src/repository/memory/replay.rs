//! In-memory ReplayRepository implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::replay::ReplayLog;
use crate::repository::traits::validate_id;
use crate::repository::{ReplayRepository, RepositoryError, Result};

/// In-memory implementation of ReplayRepository.
pub struct InMemoryReplayRepository {
    logs: RwLock<HashMap<String, ReplayLog>>,
}

impl InMemoryReplayRepository {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryReplayRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayRepository for InMemoryReplayRepository {
    fn save(&self, id: &str, log: &ReplayLog) -> Result<()> {
        validate_id(id)?;
        let mut logs = self
            .logs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        logs.insert(id.to_string(), log.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<ReplayLog>> {
        let logs = self
            .logs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(logs.get(id).cloned())
    }

    fn exists(&self, id: &str) -> bool {
        self.logs
            .read()
            .map(|logs| logs.contains_key(id))
            .unwrap_or(false)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut logs = self
            .logs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        logs.remove(id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let logs = self
            .logs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = logs.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
