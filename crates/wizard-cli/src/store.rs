use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use wizard_spec::{
    AnswerMap, AnswerStore, StoreError,
    store::{decode_answers, encode_answers},
};

/// Persists each key as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl AnswerStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<AnswerMap>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => decode_answers(key, &raw).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, key: &str, answers: &AnswerMap) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let raw = encode_answers(answers)?;
        fs::write(self.path_for(key), raw)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wizard_spec::{AnswerValue, load_or_none};

    #[test]
    fn missing_file_loads_as_none() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(temp_dir.path());
        assert!(store.load("wizard").expect("load").is_none());
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut store = FileStore::new(temp_dir.path().join("nested"));
        let answers: AnswerMap = [
            ("q1", AnswerValue::from("yes")),
            ("q2", AnswerValue::List(vec![])),
        ]
        .into_iter()
        .collect();
        store.save("wizard", &answers).expect("save");
        assert!(store.path_for("wizard").exists());
        assert_eq!(store.load("wizard").expect("load"), Some(answers));

        store.remove("wizard").expect("remove");
        assert!(!store.path_for("wizard").exists());
        store.remove("wizard").expect("remove twice");
    }

    #[test]
    fn corrupt_file_degrades_to_no_state() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(temp_dir.path());
        fs::write(store.path_for("wizard"), "[1, 2").expect("write");
        assert!(matches!(store.load("wizard"), Err(StoreError::Parse { .. })));
        assert_eq!(load_or_none(&store, "wizard"), None);
    }
}
