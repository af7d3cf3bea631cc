//! Account creation and login use cases

use crate::application::JournalSession;
use crate::domain::{EntryCollection, Username};
use crate::error::{JournalError, Result};
use crate::infrastructure::EntryStore;
use zeroize::Zeroizing;

/// Service for creating accounts and opening journals
pub struct AccountService<S: EntryStore + Clone> {
    store: S,
}

impl<S: EntryStore + Clone> AccountService<S> {
    pub fn new(store: S) -> Self {
        AccountService { store }
    }

    /// Create a user with an empty journal and open a session for it
    pub fn create(&self, username: &str, password: &str, confirm: &str) -> Result<JournalSession<S>> {
        let user: Username = username.parse()?;
        if self.store.user_exists(&user) {
            return Err(JournalError::UserExists(user.to_string()));
        }
        if password.is_empty() {
            return Err(JournalError::InvalidPassword(
                "password cannot be empty".to_string(),
            ));
        }
        if password != confirm {
            return Err(JournalError::InvalidPassword(
                "passwords do not match".to_string(),
            ));
        }

        self.store.create_user(&user, password)?;
        Ok(JournalSession::new(
            self.store.clone(),
            user,
            Zeroizing::new(password.to_string()),
            EntryCollection::new(),
        ))
    }

    /// Decrypt an existing user's journal
    pub fn login(&self, username: &str, password: &str) -> Result<JournalSession<S>> {
        let user: Username = username.parse()?;
        let collection = self.store.load(&user, password).inspect_err(|e| {
            tracing::warn!(user = %user, error = %e, "login failed");
        })?;

        Ok(JournalSession::new(
            self.store.clone(),
            user,
            Zeroizing::new(password.to_string()),
            collection,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::KdfParams;
    use crate::infrastructure::FileEntryStore;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> AccountService<FileEntryStore> {
        AccountService::new(
            FileEntryStore::new(temp.path().to_path_buf()).with_kdf(KdfParams::new(1024, 1, 1)),
        )
    }

    #[test]
    fn test_create_then_login() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let session = service.create("alice", "pw123", "pw123").unwrap();
        assert_eq!(session.user().as_str(), "alice");
        assert!(session.entries().is_empty());

        let again = service.login("alice", "pw123").unwrap();
        assert!(again.entries().is_empty());
    }

    #[test]
    fn test_create_rejections() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert!(matches!(
            service.create("bad name", "pw", "pw"),
            Err(JournalError::InvalidUsername(_))
        ));
        assert!(matches!(
            service.create("alice", "pw", "pW"),
            Err(JournalError::InvalidPassword(_))
        ));
        assert!(matches!(
            service.create("alice", "", ""),
            Err(JournalError::InvalidPassword(_))
        ));

        service.create("alice", "pw", "pw").unwrap();
        assert!(matches!(
            service.create("alice", "pw", "pw"),
            Err(JournalError::UserExists(_))
        ));
    }

    #[test]
    fn test_login_failures() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service.create("alice", "pw123", "pw123").unwrap();

        assert!(matches!(
            service.login("alice", "wrong"),
            Err(JournalError::Authentication(_))
        ));
        assert!(matches!(
            service.login("bob", "pw123"),
            Err(JournalError::UserNotFound(_))
        ));
    }
}
