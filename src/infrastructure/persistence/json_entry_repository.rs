//! JSON file implementation of the entry repository.
//!
//! The whole store lives in memory behind a single mutex and is rewritten to
//! disk after every mutation. The file is a JSON object keyed by short code:
//!
//! ```json
//! { "aB3x_Q": { "visits": 2, "original_url": "https://example.com/page" } }
//! ```
//!
//! Writes go to a `.tmp` sibling which is synced and then renamed over the
//! target, so a crash mid-write leaves the previous state intact.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Entry, EntryRecord};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_reserved};

/// Maximum number of codes drawn for a single `create` before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Source of candidate short codes.
pub type CodeGenerator = Box<dyn Fn() -> Result<String, AppError> + Send + Sync>;

/// In-memory image of the store file.
///
/// `entries` keeps insertion order; the two maps index into it.
#[derive(Default)]
struct StoreState {
    entries: Vec<Entry>,
    by_code: HashMap<String, usize>,
    by_url: HashMap<String, usize>,
}

impl StoreState {
    fn push(&mut self, entry: Entry) {
        let index = self.entries.len();
        self.by_code.insert(entry.code.clone(), index);
        // Files written before dedup may hold the same URL twice; the oldest wins.
        self.by_url.entry(entry.original_url.clone()).or_insert(index);
        self.entries.push(entry);
    }

    /// Undoes the most recent `push`.
    fn pop(&mut self) {
        if let Some(entry) = self.entries.pop() {
            let index = self.entries.len();
            self.by_code.remove(&entry.code);
            if self.by_url.get(&entry.original_url) == Some(&index) {
                self.by_url.remove(&entry.original_url);
            }
        }
    }

    fn to_json(&self) -> Result<Vec<u8>, AppError> {
        let mut map = Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            let record = serde_json::to_value(entry.to_record()).map_err(|e| {
                AppError::internal("Failed to serialize entry", json!({ "reason": e.to_string() }))
            })?;
            map.insert(entry.code.clone(), record);
        }

        serde_json::to_vec(&Value::Object(map)).map_err(|e| {
            AppError::internal("Failed to serialize store", json!({ "reason": e.to_string() }))
        })
    }

    fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: Map<String, Value> = serde_json::from_slice(bytes)?;

        let mut state = Self::default();
        for (code, value) in raw {
            let record: EntryRecord = serde_json::from_value(value)?;
            state.push(Entry::from_record(code, record));
        }

        Ok(state)
    }
}

/// File-backed store of short code entries.
///
/// Every operation holds the state lock for its full duration, persist step
/// included, so concurrent callers observe a single serial history.
pub struct JsonFileEntryRepository {
    path: PathBuf,
    state: Mutex<StoreState>,
    generate: CodeGenerator,
}

impl JsonFileEntryRepository {
    /// Opens the store at `path` using random code generation.
    ///
    /// A missing file or one that is not valid JSON yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageIo`] if the file exists but cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        Self::open_with_generator(path, Box::new(generate_code)).await
    }

    /// Opens the store with a custom code source.
    pub async fn open_with_generator(
        path: impl Into<PathBuf>,
        generate: CodeGenerator,
    ) -> Result<Self, AppError> {
        let path = path.into();
        let state = load_state(&path).await?;

        Ok(Self {
            path,
            state: Mutex::new(state),
            generate,
        })
    }

    async fn persist(&self, state: &StoreState) -> Result<(), AppError> {
        let bytes = state.to_json()?;

        if let Err(e) = write_atomically(&self.path, &bytes).await {
            error!(path = %self.path.display(), error = %e, "Failed to persist store");
            metrics::counter!("shortstat_storage_failures_total").increment(1);
            return Err(AppError::storage(e));
        }

        Ok(())
    }
}

#[async_trait]
impl EntryRepository for JsonFileEntryRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<Entry>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .by_url
            .get(url)
            .map(|&index| state.entries[index].clone()))
    }

    async fn create(&self, url: &str) -> Result<Entry, AppError> {
        let mut state = self.state.lock().await;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = (self.generate)()?;

            if is_reserved(&code) || state.by_code.contains_key(&code) {
                debug!("Short code {} unavailable, regenerating", code);
                continue;
            }

            let entry = Entry::new(code, url);
            state.push(entry.clone());

            if let Err(e) = self.persist(&state).await {
                state.pop();
                return Err(e);
            }

            return Ok(entry);
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    async fn get(&self, code: &str) -> Result<Option<Entry>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .by_code
            .get(code)
            .map(|&index| state.entries[index].clone()))
    }

    async fn increment_visits(&self, code: &str) -> Result<Entry, AppError> {
        let mut state = self.state.lock().await;

        let Some(&index) = state.by_code.get(code) else {
            return Err(AppError::not_found(
                "Short URL not found",
                json!({ "code": code }),
            ));
        };

        let previous = state.entries[index].visits;
        state.entries[index].visits = previous.saturating_add(1);

        if let Err(e) = self.persist(&state).await {
            state.entries[index].visits = previous;
            return Err(e);
        }

        Ok(state.entries[index].clone())
    }

    async fn all_sorted_by_visits(&self) -> Result<Vec<Entry>, AppError> {
        let state = self.state.lock().await;
        let mut entries = state.entries.clone();
        entries.sort_by(|a, b| b.visits.cmp(&a.visits));
        Ok(entries)
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.state.lock().await.entries.len())
    }

    async fn check_writable(&self) -> Result<(), AppError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if !meta.is_file() => {
                return Err(unwritable(&self.path, "not a regular file"));
            }
            Ok(meta) if meta.permissions().readonly() => {
                return Err(unwritable(&self.path, "read-only"));
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(AppError::storage(e)),
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        match tokio::fs::metadata(dir).await {
            Ok(meta) if !meta.is_dir() => Err(unwritable(dir, "not a directory")),
            Ok(meta) if meta.permissions().readonly() => Err(unwritable(dir, "read-only")),
            Ok(_) => Ok(()),
            // Created on the first write.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(e)),
        }
    }
}

fn unwritable(path: &Path, reason: &str) -> AppError {
    AppError::storage(std::io::Error::other(format!(
        "{} is {}",
        path.display(),
        reason
    )))
}

/// Reads the store file.
///
/// A missing or corrupt file loads as empty; any other read error is
/// returned so the existing file is never overwritten unseen.
async fn load_state(path: &Path) -> Result<StoreState, AppError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No store at {}, starting empty", path.display());
            return Ok(StoreState::default());
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read store");
            return Err(AppError::storage(e));
        }
    };

    match StoreState::from_json(&bytes) {
        Ok(state) => {
            info!("Loaded {} entries from {}", state.entries.len(), path.display());
            Ok(state)
        }
        Err(e) => {
            warn!("Store at {} is corrupt: {}. Starting empty.", path.display(), e);
            Ok(StoreState::default())
        }
    }
}

/// Writes `bytes` to a synced temporary sibling and renames it over `path`.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("url_stats.json")
    }

    /// Generator that replays a fixed list of codes.
    fn scripted(codes: &[&str]) -> CodeGenerator {
        let queue = std::sync::Mutex::new(
            codes
                .iter()
                .map(|c| c.to_string())
                .collect::<VecDeque<_>>(),
        );
        Box::new(move || {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AppError::internal("script exhausted", json!({})))
        })
    }

    async fn read_file(path: &Path) -> Map<String, Value> {
        let bytes = tokio::fs::read(path).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileEntryRepository::open(store_path(&dir)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.all_sorted_by_visits().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        tokio::fs::write(&path, b"{ this is not json").await.unwrap();

        let repo = JsonFileEntryRepository::open(&path).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wrong_shape_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        tokio::fs::write(&path, br#"{"abc123": {"visits": "many"}}"#)
            .await
            .unwrap();

        let repo = JsonFileEntryRepository::open(&path).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_path_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("is_a_dir");
        std::fs::create_dir(&path).unwrap();

        let result = JsonFileEntryRepository::open(&path).await;

        assert!(matches!(result, Err(AppError::StorageIo { .. })));
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn test_create_persists_entry() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let repo = JsonFileEntryRepository::open(&path).await.unwrap();

        let entry = repo.create("https://example.com/page").await.unwrap();
        assert_eq!(entry.code.len(), 6);
        assert_eq!(entry.visits, 0);

        let on_disk = read_file(&path).await;
        assert_eq!(on_disk.len(), 1);
        assert_eq!(
            on_disk[&entry.code],
            json!({ "visits": 0, "original_url": "https://example.com/page" })
        );
    }

    #[tokio::test]
    async fn test_find_by_url_and_get() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileEntryRepository::open(store_path(&dir)).await.unwrap();

        let entry = repo.create("https://example.com").await.unwrap();

        let by_url = repo.find_by_url("https://example.com").await.unwrap();
        assert_eq!(by_url, Some(entry.clone()));

        let by_code = repo.get(&entry.code).await.unwrap();
        assert_eq!(by_code, Some(entry));

        assert!(repo.find_by_url("https://example.com/").await.unwrap().is_none());
        assert!(repo.get("nope00").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileEntryRepository::open_with_generator(
            store_path(&dir),
            scripted(&["aaaaaa", "aaaaaa", "bbbbbb"]),
        )
        .await
        .unwrap();

        let first = repo.create("https://one.example").await.unwrap();
        let second = repo.create("https://two.example").await.unwrap();

        assert_eq!(first.code, "aaaaaa");
        assert_eq!(second.code, "bbbbbb");

        let kept = repo.get("aaaaaa").await.unwrap().unwrap();
        assert_eq!(kept.original_url, "https://one.example");
    }

    #[tokio::test]
    async fn test_create_skips_reserved_codes() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileEntryRepository::open_with_generator(
            store_path(&dir),
            scripted(&["health", "xyz789"]),
        )
        .await
        .unwrap();

        let entry = repo.create("https://example.com").await.unwrap();
        assert_eq!(entry.code, "xyz789");
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_attempts() {
        let dir = TempDir::new().unwrap();
        let mut script = vec!["aaaaaa"];
        script.extend(std::iter::repeat_n("aaaaaa", MAX_CODE_ATTEMPTS));
        let repo =
            JsonFileEntryRepository::open_with_generator(store_path(&dir), scripted(&script))
                .await
                .unwrap();

        repo.create("https://one.example").await.unwrap();
        let result = repo.create("https://two.example").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_visits() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let repo = JsonFileEntryRepository::open(&path).await.unwrap();

        let entry = repo.create("https://example.com").await.unwrap();
        repo.increment_visits(&entry.code).await.unwrap();
        let updated = repo.increment_visits(&entry.code).await.unwrap();

        assert_eq!(updated.visits, 2);
        assert_eq!(read_file(&path).await[&entry.code]["visits"], 2);
    }

    #[tokio::test]
    async fn test_increment_visits_unknown_code() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let repo = JsonFileEntryRepository::open(&path).await.unwrap();

        let result = repo.increment_visits("doesnotexist").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_sorted_by_visits_keeps_insertion_order_on_ties() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileEntryRepository::open_with_generator(
            store_path(&dir),
            scripted(&["first1", "second", "third3", "fourth"]),
        )
        .await
        .unwrap();

        for url in ["https://a.example", "https://b.example", "https://c.example", "https://d.example"] {
            repo.create(url).await.unwrap();
        }
        repo.increment_visits("third3").await.unwrap();
        repo.increment_visits("third3").await.unwrap();
        repo.increment_visits("fourth").await.unwrap();

        let codes: Vec<String> = repo
            .all_sorted_by_visits()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.code)
            .collect();

        assert_eq!(codes, vec!["third3", "fourth", "first1", "second"]);
    }

    #[tokio::test]
    async fn test_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let original = {
            let repo = JsonFileEntryRepository::open(&path).await.unwrap();
            let a = repo.create("https://a.example").await.unwrap();
            repo.create("https://b.example").await.unwrap();
            repo.increment_visits(&a.code).await.unwrap();
            repo.all_sorted_by_visits().await.unwrap()
        };

        let reloaded = JsonFileEntryRepository::open(&path).await.unwrap();
        assert_eq!(reloaded.all_sorted_by_visits().await.unwrap(), original);
        assert!(
            reloaded
                .find_by_url("https://b.example")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_load_keeps_file_order_for_ties() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        tokio::fs::write(
            &path,
            br#"{"zzzzzz":{"visits":1,"original_url":"https://z.example"},
                 "aaaaaa":{"visits":1,"original_url":"https://a.example"},
                 "mmmmmm":{"visits":5,"original_url":"https://m.example"}}"#,
        )
        .await
        .unwrap();

        let repo = JsonFileEntryRepository::open(&path).await.unwrap();
        let codes: Vec<String> = repo
            .all_sorted_by_visits()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.code)
            .collect();

        assert_eq!(codes, vec!["mmmmmm", "zzzzzz", "aaaaaa"]);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocked");
        let repo = JsonFileEntryRepository::open(&path).await.unwrap();

        // A directory in place of the file makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        let result = repo.create("https://example.com").await;

        assert!(matches!(result, Err(AppError::StorageIo { .. })));
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.find_by_url("https://example.com").await.unwrap().is_none());
        assert!(!dir.path().join("blocked.tmp").exists());
    }

    #[tokio::test]
    async fn test_check_writable() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let repo = JsonFileEntryRepository::open(&path).await.unwrap();

        // Missing file in an existing directory is fine.
        assert!(repo.check_writable().await.is_ok());

        repo.create("https://example.com").await.unwrap();
        assert!(repo.check_writable().await.is_ok());

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(matches!(
            repo.check_writable().await,
            Err(AppError::StorageIo { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_serialized() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let repo = Arc::new(JsonFileEntryRepository::open(&path).await.unwrap());
        let code = repo.create("https://example.com").await.unwrap().code;

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let repo = repo.clone();
                let code = code.clone();
                tokio::spawn(async move { repo.increment_visits(&code).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.get(&code).await.unwrap().unwrap().visits, 25);
        assert_eq!(read_file(&path).await[&code]["visits"], 25);
    }
}
