//! Session identity service
//!
//! Loads and persists the session context (token, cached user, user id)
//! through the injected storage provider. The resulting `SessionContext` is
//! passed explicitly to every fetcher.

use levelgate_domain::{SessionContext, StoredUser, UserId};
use levelgate_ports::outbound::{storage_keys, StorageProvider};

/// Service for managing the stored session
pub struct SessionService<S: StorageProvider> {
    storage: S,
}

impl<S: StorageProvider> SessionService<S> {
    /// Create a new SessionService with the given storage provider
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the session from storage.
    ///
    /// A corrupt `user` entry is ignored rather than failing the load; the
    /// session then relies on `userId` alone.
    pub fn load(&self) -> SessionContext {
        let token = self.storage.load(storage_keys::TOKEN);
        let user_id = self.storage.load(storage_keys::USER_ID).map(UserId::from);
        let user = self
            .storage
            .load(storage_keys::USER)
            .and_then(|raw| match serde_json::from_str::<StoredUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable stored user");
                    None
                }
            });

        SessionContext::new(token, user_id, user)
    }

    /// Persist a session, removing keys the session does not carry.
    pub fn save(&self, session: &SessionContext) {
        match session.token() {
            Some(token) => self.storage.save(storage_keys::TOKEN, token),
            None => self.storage.remove(storage_keys::TOKEN),
        }

        match session.user_id() {
            Some(user_id) => self.storage.save(storage_keys::USER_ID, user_id.as_str()),
            None => self.storage.remove(storage_keys::USER_ID),
        }

        match session.user().map(serde_json::to_string) {
            Some(Ok(json)) => self.storage.save(storage_keys::USER, &json),
            Some(Err(e)) => tracing::error!(error = %e, "Failed to serialize stored user"),
            None => self.storage.remove(storage_keys::USER),
        }
    }

    /// Forget the session ("log out")
    pub fn clear(&self) {
        self.storage.remove(storage_keys::TOKEN);
        self.storage.remove(storage_keys::USER);
        self.storage.remove(storage_keys::USER_ID);
    }
}
