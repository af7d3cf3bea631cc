//! Encrypted per-user entry store

use crate::domain::{EntryCollection, Username};
use crate::error::{JournalError, Result};
use crate::infrastructure::crypto::{self, CryptoError, KdfParams};
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Abstract store for user journals
pub trait EntryStore {
    /// Whether a journal file exists for this user
    fn user_exists(&self, user: &Username) -> bool;

    /// Create an empty journal for a new user
    fn create_user(&self, user: &Username, password: &str) -> Result<()>;

    /// Decrypt and parse the user's collection
    fn load(&self, user: &Username, password: &str) -> Result<EntryCollection>;

    /// Back up the current file, then replace it with the encrypted collection
    fn save(&self, user: &Username, password: &str, collection: &EntryCollection) -> Result<()>;
}

/// File system implementation of EntryStore
#[derive(Debug, Clone)]
pub struct FileEntryStore {
    root: PathBuf,
    kdf: KdfParams,
    backup_retention: usize,
}

impl FileEntryStore {
    /// Create a store rooted at `root` with default KDF parameters and retention
    pub fn new(root: PathBuf) -> Self {
        FileEntryStore {
            root,
            kdf: KdfParams::default(),
            backup_retention: 10,
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Number of backups kept per user; 0 keeps all of them
    pub fn with_backup_retention(mut self, keep: usize) -> Self {
        self.backup_retention = keep;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the user's encrypted journal
    pub fn journal_path(&self, user: &Username) -> PathBuf {
        self.root.join(format!("journal_{}.enc", user))
    }

    /// All backups of the user's journal, oldest first
    pub fn backups(&self, user: &Username) -> Result<Vec<PathBuf>> {
        let prefix = format!("journal_{}.", user);
        let mut found: Vec<(BackupStamp, PathBuf)> = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(stamp) = BackupStamp::parse(name, &prefix) {
                found.push((stamp, path));
            }
        }

        found.sort();
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    /// The newest backup, if any
    pub fn latest_backup(&self, user: &Username) -> Result<Option<PathBuf>> {
        Ok(self.backups(user)?.pop())
    }

    /// Decrypt any journal file (primary or backup)
    pub fn load_from(&self, path: &Path, password: &str) -> Result<EntryCollection> {
        let sealed = fs::read(path)?;
        let plaintext = crypto::open(password.as_bytes(), &sealed).map_err(auth_error)?;

        serde_json::from_slice(&plaintext).map_err(|e| {
            JournalError::Authentication(format!("journal contents are corrupted: {}", e))
        })
    }

    fn write_collection(
        &self,
        path: &Path,
        password: &str,
        collection: &EntryCollection,
    ) -> Result<()> {
        let json = serde_json::to_vec(collection)?;
        let sealed = crypto::seal(password.as_bytes(), &self.kdf, &json).map_err(|e| match e {
            CryptoError::InvalidParams(msg) => JournalError::Config(msg),
            other => JournalError::Io(std::io::Error::other(other.to_string())),
        })?;
        write_atomic(path, &sealed)
    }

    /// Copy the current journal to a fresh timestamped backup
    fn backup(&self, user: &Username) -> Result<Option<PathBuf>> {
        let primary = self.journal_path(user);
        if !primary.exists() {
            return Ok(None);
        }

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%6f").to_string();
        let mut backup = self.root.join(format!("journal_{}.{}.bak", user, stamp));
        let mut counter = 1;
        while backup.exists() {
            backup = self
                .root
                .join(format!("journal_{}.{}.{}.bak", user, stamp, counter));
            counter += 1;
        }

        fs::copy(&primary, &backup)?;
        tracing::debug!(backup = %backup.display(), "backed up journal");
        Ok(Some(backup))
    }

    /// Delete the oldest backups beyond the retention limit
    fn prune_backups(&self, user: &Username) -> Result<()> {
        if self.backup_retention == 0 {
            return Ok(());
        }

        let backups = self.backups(user)?;
        if backups.len() <= self.backup_retention {
            return Ok(());
        }

        let excess = backups.len() - self.backup_retention;
        for old in &backups[..excess] {
            if let Err(e) = fs::remove_file(old) {
                tracing::warn!(backup = %old.display(), error = %e, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl EntryStore for FileEntryStore {
    fn user_exists(&self, user: &Username) -> bool {
        self.journal_path(user).is_file()
    }

    fn create_user(&self, user: &Username, password: &str) -> Result<()> {
        if self.user_exists(user) {
            return Err(JournalError::UserExists(user.to_string()));
        }

        self.write_collection(&self.journal_path(user), password, &EntryCollection::new())?;
        tracing::info!(user = %user, "created journal");
        Ok(())
    }

    fn load(&self, user: &Username, password: &str) -> Result<EntryCollection> {
        let path = self.journal_path(user);
        if !path.exists() {
            return Err(JournalError::UserNotFound(user.to_string()));
        }

        let collection = self.load_from(&path, password)?;
        tracing::info!(user = %user, entries = collection.len(), "loaded journal");
        Ok(collection)
    }

    fn save(&self, user: &Username, password: &str, collection: &EntryCollection) -> Result<()> {
        self.backup(user)?;
        self.write_collection(&self.journal_path(user), password, collection)?;
        self.prune_backups(user)?;

        tracing::info!(user = %user, entries = collection.len(), "saved journal");
        Ok(())
    }
}

fn auth_error(err: CryptoError) -> JournalError {
    JournalError::Authentication(err.to_string())
}

/// Sort key of a backup file name: `journal_<user>.<stamp>[.<n>].bak`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BackupStamp {
    stamp: String,
    counter: u32,
}

impl BackupStamp {
    fn parse(file_name: &str, prefix: &str) -> Option<Self> {
        let rest = file_name.strip_prefix(prefix)?.strip_suffix(".bak")?;
        let mut parts = rest.split('.');
        let stamp = parts.next()?;
        let counter = match parts.next() {
            Some(n) => n.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() || stamp.is_empty() {
            return None;
        }

        Some(BackupStamp {
            stamp: stamp.to_string(),
            counter,
        })
    }
}

/// Write a file using a best-effort atomic replace:
/// write to a temp file in the same directory, then rename into place.
///
/// On Windows, `rename` does not overwrite existing files, so we remove the destination first.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_name = format!(
        "{}.moodlog-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("journal"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(JournalError::Io(e));
    }

    if cfg!(windows) && path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entry, EntryDraft};
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> FileEntryStore {
        FileEntryStore::new(temp.path().to_path_buf()).with_kdf(KdfParams::new(1024, 1, 1))
    }

    fn alice() -> Username {
        "alice".parse().unwrap()
    }

    fn collection_of(bodies: &[&str]) -> EntryCollection {
        bodies
            .iter()
            .map(|b| Entry::from_draft(EntryDraft::new(*b, 5), Utc::now()).unwrap())
            .collect()
    }

    #[test]
    fn test_create_user_writes_empty_journal() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        assert!(!store.user_exists(&alice()));
        store.create_user(&alice(), "pw123").unwrap();
        assert!(store.user_exists(&alice()));
        assert!(temp.path().join("journal_alice.enc").exists());

        let loaded = store.load(&alice(), "pw123").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_create_existing_user_fails() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.create_user(&alice(), "pw123").unwrap();
        assert!(matches!(
            store.create_user(&alice(), "other"),
            Err(JournalError::UserExists(_))
        ));
    }

    #[test]
    fn test_load_unknown_user() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            store(&temp).load(&alice(), "pw"),
            Err(JournalError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_file_is_not_plaintext() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store
            .save(&alice(), "pw123", &collection_of(&["my secret diary"]))
            .unwrap();

        let raw = fs::read(store.journal_path(&alice())).unwrap();
        let needle = b"secret";
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_save_creates_backup_of_previous_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.save(&alice(), "pw", &collection_of(&["first"])).unwrap();
        assert!(store.latest_backup(&alice()).unwrap().is_none());

        store.save(&alice(), "pw", &collection_of(&["second"])).unwrap();
        let backup = store.latest_backup(&alice()).unwrap().unwrap();
        let previous = store.load_from(&backup, "pw").unwrap();
        assert_eq!(previous.entries()[0].body, "first");
    }

    #[test]
    fn test_backup_retention() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).with_backup_retention(2);

        for body in ["a", "b", "c", "d", "e"] {
            store.save(&alice(), "pw", &collection_of(&[body])).unwrap();
        }

        let backups = store.backups(&alice()).unwrap();
        assert_eq!(backups.len(), 2);
        let newest = store.load_from(&backups[1], "pw").unwrap();
        assert_eq!(newest.entries()[0].body, "d");
        let older = store.load_from(&backups[0], "pw").unwrap();
        assert_eq!(older.entries()[0].body, "c");
    }

    #[test]
    fn test_backups_ignore_other_users() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let al: Username = "al".parse().unwrap();

        store.save(&alice(), "pw", &collection_of(&["a"])).unwrap();
        store.save(&alice(), "pw", &collection_of(&["b"])).unwrap();
        store.save(&al, "pw", &collection_of(&["c"])).unwrap();

        assert_eq!(store.backups(&alice()).unwrap().len(), 1);
        assert!(store.backups(&al).unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_file_is_authentication_error() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.create_user(&alice(), "pw").unwrap();

        fs::write(store.journal_path(&alice()), b"not a journal").unwrap();
        assert!(matches!(
            store.load(&alice(), "pw"),
            Err(JournalError::Authentication(_))
        ));
    }

    #[test]
    fn test_backup_stamp_ordering() {
        let prefix = "journal_alice.";
        let a = BackupStamp::parse("journal_alice.20250117T093000000001.bak", prefix).unwrap();
        let b = BackupStamp::parse("journal_alice.20250117T093000000001.1.bak", prefix).unwrap();
        let c = BackupStamp::parse("journal_alice.20250117T093000000002.bak", prefix).unwrap();
        assert!(a < b && b < c);

        assert!(BackupStamp::parse("journal_alice.enc", prefix).is_none());
        assert!(BackupStamp::parse("journal_bob.20250117T093000000001.bak", prefix).is_none());
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("file.txt");

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"two");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("moodlog-tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
