//! Session context
//!
//! The per-process source of truth for "who is logged in". Login and logout
//! flow through here so that the in-memory state, the persisted credentials,
//! and interested subscribers always agree.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info};

use campushire_core::UserProfile;

use crate::client::AuthClient;
use crate::storage::CredentialStorage;
use crate::store::TokenStore;
use crate::{AuthError, AuthResult, SessionConfig};

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// What the process currently knows about the user
#[derive(Debug, Clone)]
enum SessionState {
    /// Persisted credentials have not been consulted yet
    Uninitialized,
    /// Credentials were consulted and no user is present
    Anonymous,
    /// A user is present; the token can be absent when the user was injected
    /// directly instead of authenticated
    Active {
        user: UserProfile,
        token: Option<String>,
    },
}

/// Session lifecycle notifications
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A login completed and the session is fully persisted
    LoggedIn(UserProfile),
    /// The session ended
    LoggedOut,
    /// The current user was replaced without re-authentication
    UserReplaced(UserProfile),
}

/// Mediates authentication against the auth service and owns session state
pub struct SessionContext {
    store: TokenStore,
    client: AuthClient,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    /// Create a session context over the given credential storage
    ///
    /// The context starts uninitialized; call [`initialize`](Self::initialize)
    /// to adopt whatever session the storage holds.
    pub fn new(config: SessionConfig, storage: Arc<dyn CredentialStorage>) -> AuthResult<Self> {
        let client = AuthClient::new(&config)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            store: TokenStore::new(storage),
            client,
            state: RwLock::new(SessionState::Uninitialized),
            events,
        })
    }

    /// Adopt the session persisted in storage, replacing any in-memory state
    ///
    /// Returns the restored user, or `None` when storage holds no usable
    /// session and the context becomes anonymous.
    pub fn initialize(&self) -> Option<UserProfile> {
        match self.store.load() {
            Some(credentials) => {
                debug!("Restored session for {}", credentials.user.display_string());
                let user = credentials.user.clone();
                *self.state.write().unwrap() = SessionState::Active {
                    user: credentials.user,
                    token: Some(credentials.token),
                };
                Some(user)
            }
            None => {
                debug!("No persisted session, starting anonymous");
                *self.state.write().unwrap() = SessionState::Anonymous;
                None
            }
        }
    }

    /// Authenticate against the auth service
    ///
    /// By the time this resolves, the credentials are persisted and the
    /// session is active. On any error the session and the persisted
    /// credentials are left exactly as they were, and dropping the future
    /// before completion has the same guarantee.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<UserProfile> {
        let outcome = self.client.login(email, password).await?;
        let user = outcome.profile();

        self.store.save(&outcome.token, &user);
        self.store.set_must_change_password(outcome.must_change_password);

        *self.state.write().unwrap() = SessionState::Active {
            user: user.clone(),
            token: Some(outcome.token),
        };

        info!("Authenticated as {}", user.display_string());
        let _ = self.events.send(SessionEvent::LoggedIn(user.clone()));

        Ok(user)
    }

    /// [`login`](Self::login) bounded by a deadline
    ///
    /// When the deadline passes first, the attempt is abandoned with
    /// [`AuthError::Cancelled`] and no state has changed.
    pub async fn login_with_timeout(
        &self,
        email: &str,
        password: &str,
        deadline: Duration,
    ) -> AuthResult<UserProfile> {
        match tokio::time::timeout(deadline, self.login(email, password)).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::Cancelled),
        }
    }

    /// End the session
    ///
    /// Always succeeds: persistence failures are logged inside the store and
    /// the in-memory session becomes anonymous regardless.
    pub fn logout(&self) {
        self.store.clear();
        *self.state.write().unwrap() = SessionState::Anonymous;

        info!("Session ended");
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    /// Replace the current user without re-authenticating
    ///
    /// Keeps whatever token the session already holds. Intended for flows
    /// that mutate the profile server-side and push the updated copy back.
    pub fn set_user(&self, user: UserProfile) {
        let mut state = self.state.write().unwrap();
        let token = match &*state {
            SessionState::Active { token, .. } => token.clone(),
            _ => None,
        };
        *state = SessionState::Active {
            user: user.clone(),
            token,
        };
        drop(state);

        let _ = self.events.send(SessionEvent::UserReplaced(user));
    }

    /// Change the account password, clearing any pending rotation requirement
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        self.client
            .change_password(email, current_password, new_password)
            .await?;
        self.store.set_must_change_password(false);
        Ok(())
    }

    /// The currently authenticated user, if any
    pub fn current_user(&self) -> Option<UserProfile> {
        match &*self.state.read().unwrap() {
            SessionState::Active { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    /// The current bearer token, if the session holds one
    pub fn token(&self) -> Option<String> {
        match &*self.state.read().unwrap() {
            SessionState::Active { token, .. } => token.clone(),
            _ => None,
        }
    }

    /// Whether a user is present (a token is not required)
    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.state.read().unwrap(), SessionState::Active { .. })
    }

    /// Whether persisted credentials have been consulted yet
    pub fn is_initialized(&self) -> bool {
        !matches!(&*self.state.read().unwrap(), SessionState::Uninitialized)
    }

    /// Whether the server requires a password rotation before normal use
    pub fn must_change_password(&self) -> bool {
        self.store.must_change_password()
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
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

    fn context_over(storage: Arc<MemoryStorage>) -> SessionContext {
        SessionContext::new(SessionConfig::default(), storage).unwrap()
    }

    #[tokio::test]
    async fn test_starts_uninitialized() {
        let context = context_over(Arc::new(MemoryStorage::new()));

        assert!(!context.is_initialized());
        assert!(!context.is_authenticated());
        assert_eq!(context.current_user(), None);
        assert_eq!(context.token(), None);
    }

    #[tokio::test]
    async fn test_initialize_with_empty_storage_goes_anonymous() {
        let context = context_over(Arc::new(MemoryStorage::new()));

        assert_eq!(context.initialize(), None);
        assert!(context.is_initialized());
        assert!(!context.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_restores_persisted_session() {
        let storage = Arc::new(MemoryStorage::new());
        TokenStore::new(storage.clone()).save("abc", &student_profile());

        let context = context_over(storage);
        let restored = context.initialize().unwrap();

        assert_eq!(restored, student_profile());
        assert!(context.is_authenticated());
        assert_eq!(context.token(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        TokenStore::new(storage.clone()).save("abc", &student_profile());

        let context = context_over(storage.clone());
        context.initialize();

        context.logout();
        context.logout();

        assert!(!context.is_authenticated());
        assert!(context.is_initialized());
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("user").unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_user_authenticates_without_token() {
        let context = context_over(Arc::new(MemoryStorage::new()));
        context.initialize();

        context.set_user(student_profile());

        assert!(context.is_authenticated());
        assert_eq!(context.current_user(), Some(student_profile()));
        assert_eq!(context.token(), None);
    }

    #[tokio::test]
    async fn test_set_user_keeps_existing_token() {
        let storage = Arc::new(MemoryStorage::new());
        TokenStore::new(storage.clone()).save("abc", &student_profile());

        let context = context_over(storage);
        context.initialize();

        let updated = UserProfile::new("u-1", "dana@example.edu", "Dana Q.", Role::Student);
        context.set_user(updated.clone());

        assert_eq!(context.current_user(), Some(updated));
        assert_eq!(context.token(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_unchanged() {
        let storage = Arc::new(MemoryStorage::new());
        let config = SessionConfig::with_base_url("http://127.0.0.1:9");

        let context = SessionContext::new(config, storage.clone()).unwrap();
        context.initialize();

        let error = context.login("dana@example.edu", "pw").await.unwrap_err();

        assert!(matches!(error, AuthError::Transport(_)));
        assert!(!context.is_authenticated());
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let context = context_over(Arc::new(MemoryStorage::new()));
        let mut events = context.subscribe();

        context.set_user(student_profile());
        context.logout();

        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::UserReplaced(_)
        ));
        assert!(matches!(events.try_recv().unwrap(), SessionEvent::LoggedOut));
    }
}
