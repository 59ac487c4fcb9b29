//! File-based chat storage.

use crate::config::Config;
use crate::core::ChatSession;
use crate::error::{Error, Result};
use crate::storage::dir::ensure_chat_directory;
use crate::storage::filename::{CHAT_EXTENSION, FilenameGenerator, unique_path};
use crate::storage::metadata::{ChatFileMetadata, DEFAULT_PREVIEW_CHARS, read_metadata};
use crate::storage::record::{RecordIn, RecordOut};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Chat storage rooted at one directory, with atomic writes.
#[derive(Debug, Clone)]
pub struct ChatStore {
    chat_dir: PathBuf,
    filenames: FilenameGenerator,
    preview_chars: usize,
}

impl ChatStore {
    /// Create a store for `chat_dir`.
    ///
    /// The directory is created lazily on the first save.
    #[must_use]
    pub fn new(chat_dir: impl Into<PathBuf>) -> Self {
        Self {
            chat_dir: chat_dir.into(),
            filenames: FilenameGenerator::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Create a store from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            chat_dir: config.storage.chat_dir.clone(),
            filenames: FilenameGenerator::new(config.history.slug_chars),
            preview_chars: config.history.preview_chars,
        }
    }

    /// Directory holding the chat files.
    #[must_use]
    pub fn chat_dir(&self) -> &Path {
        &self.chat_dir
    }

    /// Save `session` as a new chat file and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a session without messages, or
    /// [`Error::Io`] if the directory or file cannot be written.
    pub fn save(&self, session: &ChatSession) -> Result<PathBuf> {
        self.save_at(session, Utc::now())
    }

    /// Save `session` using `now` for the filename and `saved_at` stamp.
    ///
    /// # Errors
    ///
    /// See [`ChatStore::save`].
    pub fn save_at(&self, session: &ChatSession, now: DateTime<Utc>) -> Result<PathBuf> {
        if session.is_empty() {
            return Err(Error::InvalidInput(
                "cannot save a chat without messages".to_string(),
            ));
        }

        let dir = ensure_chat_directory(&self.chat_dir)?;
        let filename = self.filenames.generate(session, now);
        let path = unique_path(&dir, &filename);

        let contents = serde_json::to_vec_pretty(&RecordOut::new(session, now))?;
        write_atomic(&path, &contents)?;

        tracing::debug!(
            path = %path.display(),
            messages = session.len(),
            "saved chat"
        );
        Ok(path)
    }

    /// Overwrite an existing chat file with the current state of `session`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if `path` does not exist,
    /// [`Error::InvalidInput`] for a session without messages, or
    /// [`Error::Io`] if the write fails.
    pub fn update(&self, session: &ChatSession, path: &Path) -> Result<()> {
        if session.is_empty() {
            return Err(Error::InvalidInput(
                "cannot save a chat without messages".to_string(),
            ));
        }
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let contents = serde_json::to_vec_pretty(&RecordOut::new(session, Utc::now()))?;
        write_atomic(path, &contents)?;

        tracing::debug!(
            path = %path.display(),
            messages = session.len(),
            "updated chat"
        );
        Ok(())
    }

    /// Load the chat stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if `path` does not exist, or
    /// [`Error::CorruptFile`] if its content is not a valid chat record.
    pub fn load(&self, path: &Path) -> Result<ChatSession> {
        load_chat(path)
    }

    /// Summarize the chat stored at `path` without loading every message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if `path` does not exist. Corrupt
    /// content is reported in the returned metadata instead.
    pub fn info(&self, path: &Path) -> Result<ChatFileMetadata> {
        read_metadata(path, self.preview_chars)
    }

    /// List saved chats, most recently modified first.
    ///
    /// Hidden and temporary files are skipped. Corrupt chats are listed
    /// with degraded metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat directory cannot be read.
    pub fn list(&self, limit: usize) -> Result<Vec<ChatFileMetadata>> {
        let mut chats = Vec::new();

        if !self.chat_dir.is_dir() {
            return Ok(chats);
        }

        for entry in fs::read_dir(&self.chat_dir)? {
            let path = entry?.path();
            if !is_chat_file(&path) {
                continue;
            }

            match self.info(&path) {
                Ok(meta) => chats.push(meta),
                // Deleted while listing
                Err(Error::FileNotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping chat file");
                }
            }
        }

        chats.sort_by(|a, b| {
            Reverse(a.modified)
                .cmp(&Reverse(b.modified))
                .then_with(|| a.path.cmp(&b.path))
        });
        chats.truncate(limit);
        Ok(chats)
    }

    /// Delete the chat file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if it does not exist, or
    /// [`Error::InvalidInput`] if it is not a chat file.
    pub fn delete(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if !is_chat_file(path) || !path.is_file() {
            return Err(Error::InvalidInput(format!(
                "{} is not a chat file",
                path.display()
            )));
        }

        fs::remove_file(path).map_err(|e| Error::io_at(e, path))?;
        tracing::debug!(path = %path.display(), "deleted chat");
        Ok(())
    }

    /// Resolve a chat name given on the command line.
    ///
    /// Bare names refer to files in the chat directory, with the `.json`
    /// extension optional. Anything containing a path separator is used
    /// as given.
    #[must_use]
    pub fn resolve(&self, name: &str) -> PathBuf {
        let given = Path::new(name);
        if given.is_absolute() || given.components().count() > 1 {
            return given.to_path_buf();
        }

        if given.extension().is_some_and(|e| e == CHAT_EXTENSION) {
            self.chat_dir.join(name)
        } else {
            self.chat_dir.join(format!("{name}.{CHAT_EXTENSION}"))
        }
    }
}

/// Load a chat file.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if `path` does not exist,
/// [`Error::CorruptFile`] if the content is malformed, or [`Error::Io`] on
/// other read failures.
pub fn load_chat(path: &Path) -> Result<ChatSession> {
    let bytes = fs::read(path).map_err(|e| Error::io_at(e, path))?;
    let record: RecordIn = serde_json::from_slice(&bytes).map_err(|e| Error::corrupt(path, &e))?;
    let session = record
        .into_session()
        .map_err(|reason| Error::corrupt(path, &reason))?;

    tracing::debug!(
        path = %path.display(),
        messages = session.len(),
        "loaded chat"
    );
    Ok(session)
}

/// Visible `.json` files; skips in-flight temp files.
fn is_chat_file(path: &Path) -> bool {
    let visible = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| !n.starts_with('.'));
    visible && path.extension().is_some_and(|e| e == CHAT_EXTENSION)
}

/// Temp file next to `path`, hidden so listings skip it.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `contents` to `path` all-or-nothing.
///
/// Data goes to a temp file in the same directory, is synced, then renamed
/// over `path`. On failure the temp file is removed and `path` is untouched.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp = temp_path(path);

    if let Err(e) = write_then_rename(&temp, path, contents) {
        if let Err(cleanup) = fs::remove_file(&temp) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %temp.display(), error = %cleanup, "failed to remove temp file");
            }
        }
        return Err(e.into());
    }
    Ok(())
}

fn write_then_rename(temp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attachment, Message, Role};
    use crate::storage::metadata::FileStatus;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn create_test_store() -> (ChatStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ChatStore::new(temp_dir.path().join("chats"));
        (store, temp_dir)
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn sample_session() -> ChatSession {
        let mut session = ChatSession::started_at(fixed_time());
        session.push(Message::user("Hello"));
        session.push(Message::assistant("Hi there"));
        session
    }

    #[test]
    fn save_creates_directory_and_file() {
        let (store, _temp) = create_test_store();

        let path = store.save_at(&sample_session(), fixed_time()).unwrap();

        assert!(store.chat_dir().is_dir());
        assert!(path.is_file());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "hello_20240501-123000.json"
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let (store, _temp) = create_test_store();
        let mut session = sample_session().with_title("Greeting test");
        session.push(Message::system("Keep answers short").at(fixed_time()));
        session.push(
            Message::user("See attached")
                .with_attachment(Attachment::from_upload("file_1", "a.pdf", "application/pdf")),
        );

        let path = store.save(&session).unwrap();
        let loaded = store.load(&path).unwrap();

        assert_eq!(loaded, session);
    }

    #[test]
    fn round_trip_preserves_unusual_text() {
        let (store, _temp) = create_test_store();
        let mut session = ChatSession::started_at(fixed_time());
        session.push(Message::user("line one\nline two\t\"quoted\" \\ back"));
        session.push(Message::assistant("emoji 🦀 and ünïcödé"));
        session.push(Message::assistant(""));

        let path = store.save(&session).unwrap();
        assert_eq!(store.load(&path).unwrap(), session);
    }

    #[test]
    fn save_empty_session_is_rejected() {
        let (store, _temp) = create_test_store();
        let err = store.save(&ChatSession::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!store.chat_dir().exists());
    }

    #[test]
    fn colliding_saves_get_suffixes() {
        let (store, _temp) = create_test_store();
        let session = sample_session();

        let first = store.save_at(&session, fixed_time()).unwrap();
        let second = store.save_at(&session, fixed_time()).unwrap();
        let third = store.save_at(&session, fixed_time()).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("hello_20240501-123000_1.json"));
        assert!(third.ends_with("hello_20240501-123000_2.json"));
        assert_eq!(store.load(&first).unwrap(), store.load(&second).unwrap());
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let (store, _temp) = create_test_store();
        let path = store.save(&sample_session()).unwrap();

        assert!(!temp_path(&path).exists());
        let entries = fs::read_dir(store.chat_dir()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("missing-dir").join("chat.json");

        let result = write_atomic(&target, b"{}");

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!target.exists());
        assert!(!temp_path(&target).exists());
    }

    #[test]
    fn failed_rename_keeps_existing_target() {
        let temp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file rename.
        let target = temp.path().join("occupied.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner"), "x").unwrap();

        let result = write_atomic(&target, b"{}");

        assert!(result.is_err());
        assert!(target.is_dir());
        assert!(!temp_path(&target).exists());
    }

    #[test]
    fn update_overwrites_in_place() {
        let (store, _temp) = create_test_store();
        let mut session = sample_session();
        let path = store.save(&session).unwrap();

        session.push(Message::user("One more thing"));
        store.update(&session, &path).unwrap();

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(fs::read_dir(store.chat_dir()).unwrap().count(), 1);
    }

    #[test]
    fn update_missing_file_is_not_found() {
        let (store, temp) = create_test_store();
        let err = store
            .update(&sample_session(), &temp.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let (store, temp) = create_test_store();
        let err = store.load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn load_invalid_json_is_corrupt() {
        let (_store, temp) = create_test_store();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        let err = load_chat(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptFile { .. }));
    }

    #[test]
    fn load_partial_json_is_corrupt() {
        let (_store, temp) = create_test_store();
        let path = temp.path().join("partial.json");
        fs::write(
            &path,
            r#"{"format": "chatvault.session", "version": 1, "messages": [{"role": "#,
        )
        .unwrap();

        assert!(matches!(
            load_chat(&path),
            Err(Error::CorruptFile { .. })
        ));
    }

    #[test]
    fn load_invalid_utf8_is_corrupt() {
        let (_store, temp) = create_test_store();
        let path = temp.path().join("binary.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        assert!(matches!(
            load_chat(&path),
            Err(Error::CorruptFile { .. })
        ));
    }

    #[test]
    fn load_message_without_role_is_corrupt() {
        let (_store, temp) = create_test_store();
        let path = temp.path().join("norole.json");
        fs::write(
            &path,
            r#"{"format": "chatvault.session", "version": 1,
                "started_at": "2024-01-01T00:00:00Z",
                "messages": [{"content": "hi"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_chat(&path),
            Err(Error::CorruptFile { .. })
        ));
    }

    #[test]
    fn load_untagged_legacy_file_is_corrupt() {
        let (_store, temp) = create_test_store();
        let path = temp.path().join("legacy.json");
        fs::write(
            &path,
            r#"{"timestamp": "2024-01-01T00:00:00", "title": "x",
                "messages": [{"role": "user", "content": "hi"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_chat(&path),
            Err(Error::CorruptFile { .. })
        ));
    }

    #[test]
    fn info_reports_count_and_preview() {
        let (store, _temp) = create_test_store();
        let path = store.save(&sample_session()).unwrap();

        let meta = store.info(&path).unwrap();

        assert_eq!(meta.message_count, Some(2));
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.preview.as_deref(), Some("Hello"));
        assert_eq!(meta.size_bytes, fs::metadata(&path).unwrap().len());
        assert_eq!(meta.status, FileStatus::Ok);
    }

    #[test]
    fn info_after_delete_is_not_found() {
        let (store, _temp) = create_test_store();
        let path = store.save(&sample_session()).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(store.info(&path), Err(Error::FileNotFound(_))));
    }

    #[test]
    fn list_empty_or_missing_directory() {
        let (store, _temp) = create_test_store();
        assert!(store.list(10).unwrap().is_empty());
    }

    #[test]
    fn list_skips_temp_and_other_files() {
        let (store, _temp) = create_test_store();
        let path = store.save(&sample_session()).unwrap();
        fs::write(store.chat_dir().join(".orphan.json.tmp"), "{}").unwrap();
        fs::write(store.chat_dir().join("notes.txt"), "hi").unwrap();
        fs::create_dir(store.chat_dir().join("subdir.json")).unwrap();

        let chats = store.list(10).unwrap();

        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].path, path);
    }

    #[test]
    fn list_includes_corrupt_files_degraded() {
        let (store, _temp) = create_test_store();
        store.save(&sample_session()).unwrap();
        fs::write(store.chat_dir().join("corrupted.json"), "not json").unwrap();
        fs::write(store.chat_dir().join("empty.json"), "").unwrap();

        let chats = store.list(10).unwrap();

        assert_eq!(chats.len(), 3);
        assert_eq!(chats.iter().filter(|c| c.is_corrupt()).count(), 2);
    }

    #[test]
    fn list_newest_first_and_limited() {
        let (store, _temp) = create_test_store();
        let old = store.save(&sample_session()).unwrap();
        let new = store.save(&sample_session()).unwrap();

        let old_time = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(old_time)
            .unwrap();

        let chats = store.list(10).unwrap();
        assert_eq!(chats[0].path, new);
        assert_eq!(chats[1].path, old);

        assert_eq!(store.list(1).unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_file() {
        let (store, _temp) = create_test_store();
        let path = store.save(&sample_session()).unwrap();

        store.delete(&path).unwrap();

        assert!(!path.exists());
        assert!(matches!(store.delete(&path), Err(Error::FileNotFound(_))));
    }

    #[test]
    fn delete_refuses_non_chat_files() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("keep.txt");
        fs::write(&path, "x").unwrap();

        assert!(matches!(store.delete(&path), Err(Error::InvalidInput(_))));
        assert!(path.exists());
    }

    #[test]
    fn resolve_bare_names() {
        let store = ChatStore::new("/data/chats");
        assert_eq!(
            store.resolve("hello_20240501-123000"),
            PathBuf::from("/data/chats/hello_20240501-123000.json")
        );
        assert_eq!(
            store.resolve("hello_20240501-123000.json"),
            PathBuf::from("/data/chats/hello_20240501-123000.json")
        );
        assert_eq!(
            store.resolve("/elsewhere/x.json"),
            PathBuf::from("/elsewhere/x.json")
        );
        assert_eq!(store.resolve("sub/x.json"), PathBuf::from("sub/x.json"));
    }

    #[test]
    fn roles_survive_round_trip() {
        let (store, _temp) = create_test_store();
        let mut session = ChatSession::started_at(fixed_time());
        for role in [Role::System, Role::User, Role::Assistant, Role::User] {
            session.push(Message::new(role, role.as_str()));
        }

        let path = store.save(&session).unwrap();
        let roles: Vec<Role> = store
            .load(&path)
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
    }

    fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
        (0i64..4_102_444_800, 0u32..1_000_000_000)
            .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap())
    }

    fn message_strategy() -> impl Strategy<Value = Message> {
        (
            role_strategy(),
            any::<String>(),
            proptest::option::of(timestamp_strategy()),
        )
            .prop_map(|(role, content, timestamp)| {
                let message = Message::new(role, content);
                match timestamp {
                    Some(ts) => message.at(ts),
                    None => message,
                }
            })
    }

    fn session_strategy() -> impl Strategy<Value = ChatSession> {
        (
            timestamp_strategy(),
            proptest::option::of(any::<String>()),
            proptest::collection::vec(message_strategy(), 1..8),
        )
            .prop_map(|(started_at, title, messages)| {
                ChatSession::from_parts(started_at, title, messages)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn any_session_survives_save_and_load(session in session_strategy()) {
            let (store, _temp) = create_test_store();
            let path = store.save(&session).unwrap();
            prop_assert_eq!(store.load(&path).unwrap(), session);
        }
    }
}
