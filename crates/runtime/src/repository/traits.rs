//! Repository contract for recorded sessions.

use crate::replay::ReplayLog;
use crate::repository::Result;

/// Repository for replay logs, keyed by session id.
pub trait ReplayRepository: Send + Sync {
    fn save(&self, id: &str, log: &ReplayLog) -> Result<()>;

    /// Load a replay by id. Returns `Ok(None)` if none is stored.
    fn load(&self, id: &str) -> Result<Option<ReplayLog>>;

    fn exists(&self, id: &str) -> bool;

    fn delete(&self, id: &str) -> Result<()>;

    /// List stored ids in ascending order.
    fn list_ids(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

/// Ids become file names, so only a conservative character set is allowed.
pub(crate) fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(crate::repository::RepositoryError::InvalidId(id.to_string()))
    }
}
