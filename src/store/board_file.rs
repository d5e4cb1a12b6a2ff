//! Board list file for ttybbs.
//!
//! Format: `{"boards": ["general", "tech"]}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::atomic::write_atomic;
use super::{normalize_board_names, BoardListStore};
use crate::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct BoardListDocument {
    #[serde(default)]
    boards: Vec<String>,
}

/// Board list stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct BoardFile {
    path: PathBuf,
}

impl BoardFile {
    /// Create a board list store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardListStore for BoardFile {
    fn load(&self) -> Result<Vec<String>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let document: BoardListDocument = serde_json::from_slice(&data)?;
        Ok(normalize_board_names(document.boards))
    }

    fn save(&self, names: &[String]) -> Result<()> {
        let document = BoardListDocument {
            boards: normalize_board_names(names),
        };
        let data = serde_json::to_vec_pretty(&document)?;
        write_atomic(&self.path, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BbsError;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = BoardFile::new(dir.path().join("boards.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load() {
        let dir = TempDir::new().unwrap();
        let store = BoardFile::new(dir.path().join("data").join("boards.json"));
        let names = vec!["general".to_string(), "tech".to_string()];

        store.save(&names).unwrap();

        assert_eq!(store.load().unwrap(), names);
    }

    #[test]
    fn test_save_normalizes() {
        let dir = TempDir::new().unwrap();
        let store = BoardFile::new(dir.path().join("boards.json"));
        let names: Vec<String> = [" general", "", "tech", "general"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        store.save(&names).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"boards": ["general", "tech"]}));
    }

    #[test]
    fn test_load_normalizes_hand_edited_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boards.json");
        fs::write(&path, r#"{"boards": ["tech ", "tech", "", "retro"]}"#).unwrap();

        let names = BoardFile::new(&path).load().unwrap();

        assert_eq!(names, vec!["tech", "retro"]);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boards.json");
        fs::write(&path, "not json").unwrap();

        let result = BoardFile::new(&path).load();

        assert!(matches!(result, Err(BbsError::Json(_))));
    }
}
