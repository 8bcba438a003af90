use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Somewhere the best score survives between runs
pub trait HighScoreStore {
    /// The stored record, 0 when there is none or it cannot be read
    fn load(&self) -> u32;

    fn save(&mut self, score: u32) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// JSON file on disk, `{"high_score": N}`
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u32> {
        let contents = fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("Failed to read {}", self.path.display()))?;
        let record: HighScoreRecord = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(record.high_score)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        if !self.path.exists() {
            return 0;
        }
        match self.read() {
            Ok(score) => score,
            Err(err) => {
                log::warn!("Ignoring stored high score: {err:#}");
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<()> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
        fs::write(&self.path, json)
            .wrap_err_with(|| format!("Failed to write {}", self.path.display()))?;
        log::info!("Saved high score {score} to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the record in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    pub high_score: u32,
    pub saves: usize,
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.high_score
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.high_score = score;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHighScoreStore::new(dir.path().join("highscore.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        let mut store = FileHighScoreStore::new(&path);
        store.save(4200).unwrap();

        let reopened = FileHighScoreStore::new(&path);
        assert_eq!(reopened.load(), 4200);
        assert!(fs::read_to_string(&path).unwrap().contains("\"high_score\": 4200"));
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FileHighScoreStore::new(&path).load(), 0);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileHighScoreStore::new(dir.path().join("nope").join("hs.json"));
        assert!(store.save(10).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHighScoreStore::default();
        assert_eq!(store.load(), 0);
        store.save(99).unwrap();
        assert_eq!(store.load(), 99);
        assert_eq!(store.saves, 1);
    }
}
