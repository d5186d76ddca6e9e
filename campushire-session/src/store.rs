//! Persistent token store
//!
//! Saves and restores the authenticated session between client restarts. The
//! on-disk layout uses the same keys the browser clients use (`token`, `user`,
//! `mustChangePassword`), so a native client and a web client pointed at the
//! same storage read each other's sessions.
//!
//! Persistence failures are logged and swallowed: a session that fails to
//! persist degrades to an in-memory session, it never breaks a login that the
//! auth service already accepted.

use std::sync::Arc;
use tracing::{debug, warn};

use campushire_core::UserProfile;

use crate::storage::CredentialStorage;

/// Storage key for the raw bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized user profile
pub const USER_KEY: &str = "user";
/// Storage key for the forced password rotation flag
pub const MUST_CHANGE_PASSWORD_KEY: &str = "mustChangePassword";

/// A complete persisted session: both halves present and well-formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: String,
    pub user: UserProfile,
}

/// Reads and writes session credentials through a [`CredentialStorage`]
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn CredentialStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    /// Persist a token and its owning profile
    ///
    /// The token is removed first and written last, so an interruption can
    /// lose the session but can never leave a token paired with a stale or
    /// missing profile.
    pub fn save(&self, token: &str, user: &UserProfile) {
        let serialized = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize user profile, session not persisted: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.delete(TOKEN_KEY) {
            warn!("Failed to clear stale token before save: {}", e);
        }

        if let Err(e) = self.storage.set(USER_KEY, &serialized) {
            warn!("Failed to persist user profile, session not persisted: {}", e);
            return;
        }

        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            warn!("Failed to persist token, session not persisted: {}", e);
        }
    }

    /// Restore the persisted session, if a complete one exists
    ///
    /// Anything short of a token plus a parseable profile reads as absent. A
    /// malformed profile is logged and treated as no session rather than
    /// surfaced as an error.
    pub fn load(&self) -> Option<StoredCredentials> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read persisted token: {}", e);
                return None;
            }
        };

        let raw_user = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Persisted token has no user profile, discarding session");
                return None;
            }
            Err(e) => {
                warn!("Failed to read persisted user profile: {}", e);
                return None;
            }
        };

        let user: UserProfile = match serde_json::from_str(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Persisted user profile is malformed, discarding session: {}", e);
                return None;
            }
        };

        Some(StoredCredentials { token, user })
    }

    /// Remove every persisted credential; repeated calls are harmless
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY, MUST_CHANGE_PASSWORD_KEY] {
            if let Err(e) = self.storage.delete(key) {
                warn!("Failed to clear persisted key '{}': {}", key, e);
            }
        }
    }

    /// Record whether the server requires a password rotation
    pub fn set_must_change_password(&self, required: bool) {
        let value = if required { "true" } else { "false" };
        if let Err(e) = self.storage.set(MUST_CHANGE_PASSWORD_KEY, value) {
            warn!("Failed to persist password rotation flag: {}", e);
        }
    }

    /// Whether a password rotation is pending; unreadable or garbage reads as false
    pub fn must_change_password(&self) -> bool {
        match self.storage.get(MUST_CHANGE_PASSWORD_KEY) {
            Ok(Some(value)) => value == "true",
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read password rotation flag: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use campushire_core::Role;

    fn student_profile() -> UserProfile {
        UserProfile::new("u-1", "dana@example.edu", "Dana", Role::Student)
    }

    fn store_with_storage() -> (TokenStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (TokenStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (store, _) = store_with_storage();
        let user = student_profile();

        store.save("abc", &user);

        let restored = store.load().unwrap();
        assert_eq!(restored.token, "abc");
        assert_eq!(restored.user, user);
    }

    #[test]
    fn test_save_uses_browser_compatible_keys() {
        let (store, storage) = store_with_storage();

        store.save("abc", &student_profile());
        store.set_must_change_password(true);

        assert_eq!(storage.get("token").unwrap(), Some("abc".to_string()));
        assert!(storage.get("user").unwrap().unwrap().contains("dana@example.edu"));
        assert_eq!(
            storage.get("mustChangePassword").unwrap(),
            Some("true".to_string())
        );
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (store, storage) = store_with_storage();

        store.save("abc", &student_profile());
        store.set_must_change_password(true);

        store.clear();
        store.clear();

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(storage.get(MUST_CHANGE_PASSWORD_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let (store, storage) = store_with_storage();

        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_token_without_user_reads_as_absent() {
        let (store, storage) = store_with_storage();

        storage.set(TOKEN_KEY, "abc").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_user_without_token_reads_as_absent() {
        let (store, storage) = store_with_storage();

        let serialized = serde_json::to_string(&student_profile()).unwrap();
        storage.set(USER_KEY, &serialized).unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_overwrites_previous_session() {
        let (store, _) = store_with_storage();

        store.save("abc", &student_profile());

        let other = UserProfile::new("u-2", "lee@corp.example", "Lee", Role::Company)
            .with_company("c-9");
        store.save("def", &other);

        let restored = store.load().unwrap();
        assert_eq!(restored.token, "def");
        assert_eq!(restored.user.company_id.as_deref(), Some("c-9"));
    }

    #[test]
    fn test_password_flag_defaults_to_false() {
        let (store, storage) = store_with_storage();

        assert!(!store.must_change_password());

        storage.set(MUST_CHANGE_PASSWORD_KEY, "maybe").unwrap();
        assert!(!store.must_change_password());

        store.set_must_change_password(true);
        assert!(store.must_change_password());

        store.set_must_change_password(false);
        assert!(!store.must_change_password());
    }
}
