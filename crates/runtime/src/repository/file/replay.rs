//! File-based ReplayRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::replay::ReplayLog;
use crate::repository::traits::validate_id;
use crate::repository::{ReplayRepository, RepositoryError, Result};

/// File-based implementation of ReplayRepository.
///
/// Replays are stored as `replay_{id}.bin` in bincode format. Writes go to a
/// temp file first and are renamed into place; loads verify the map digest
/// before handing the log out.
pub struct FileReplayRepository {
    base_dir: PathBuf,
}

impl FileReplayRepository {
    /// Create a new file-based replay repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a replay file.
    pub fn replay_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("replay_{}.bin", id))
    }
}

impl ReplayRepository for FileReplayRepository {
    fn save(&self, id: &str, log: &ReplayLog) -> Result<()> {
        validate_id(id)?;
        let path = self.replay_path(id);
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(log).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            "Saved replay[{}] ({} frames) to {}",
            id,
            log.frames.len(),
            path.display()
        );

        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<ReplayLog>> {
        validate_id(id)?;
        let path = self.replay_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let log: ReplayLog = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        log.verify()?;

        tracing::debug!("Loaded replay[{}] from {}", id, path.display());

        Ok(Some(log))
    }

    fn exists(&self, id: &str) -> bool {
        validate_id(id).is_ok() && self.replay_path(id).exists()
    }

    fn delete(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        let path = self.replay_path(id);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted replay[{}]", id);
        }

        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("replay_")
                    .and_then(|s| s.strip_suffix(".bin"))
            {
                ids.push(id.to_string());
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameConfig, InputState, SessionStatus, Simulation};

    fn short_log(seed: u64) -> ReplayLog {
        let config = GameConfig::default();
        let (simulation, _, _) = Simulation::generate(config.clone(), seed);
        let mut log = ReplayLog::new(seed, config, simulation.grid());
        for _ in 0..30 {
            log.record(1.0 / 60.0, InputState::RIGHT, SessionStatus::Running);
        }
        log
    }

    #[test]
    fn save_load_list_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileReplayRepository::new(dir.path().join("replays")).expect("repo");
        let log = short_log(5);

        assert!(repo.load("run-1").expect("load missing").is_none());
        repo.save("run-1", &log).expect("save");
        repo.save("run-0", &short_log(6)).expect("save second");

        assert!(repo.exists("run-1"));
        assert!(!repo.replay_path("run-1").with_extension("bin.tmp").exists());
        assert_eq!(repo.load("run-1").expect("load"), Some(log));
        assert_eq!(repo.list_ids().expect("list"), vec!["run-0", "run-1"]);

        repo.delete("run-1").expect("delete");
        assert!(!repo.exists("run-1"));
        repo.delete("run-1").expect("deleting twice is fine");
    }

    #[test]
    fn path_like_ids_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileReplayRepository::new(dir.path()).expect("repo");
        let log = short_log(1);
        for id in ["", "../escape", "a/b", "with space"] {
            assert!(matches!(
                repo.save(id, &log),
                Err(RepositoryError::InvalidId(_))
            ));
            assert!(!repo.exists(id));
        }
    }

    #[test]
    fn corrupted_files_fail_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileReplayRepository::new(dir.path()).expect("repo");
        fs::write(repo.replay_path("broken"), [1u8, 2, 3]).expect("write garbage");
        assert!(matches!(
            repo.load("broken"),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn digest_is_checked_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileReplayRepository::new(dir.path()).expect("repo");
        let mut log = short_log(2);
        log.grid_digest[0] ^= 0xff;
        repo.save("tampered", &log).expect("save does not verify");
        assert!(matches!(
            repo.load("tampered"),
            Err(RepositoryError::DigestMismatch { .. })
        ));
    }
}
