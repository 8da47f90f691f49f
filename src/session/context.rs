//! Session context shared by the request wrapper and every service
//!
//! Holds the two token slots: the persistent one ("remember me") and the
//! session-scoped one. Reads prefer the persistent slot. Any change of
//! session state is broadcast so interested parties can react to it.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::models::User;
use crate::utils::errors::Result;
use super::store::{FileStore, MemoryStore, SessionStore};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const EVENT_CAPACITY: usize = 16;

/// Which slot holds the token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSlot {
    Persistent,
    Scoped,
}

impl TokenSlot {
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            TokenSlot::Persistent
        } else {
            TokenSlot::Scoped
        }
    }
}

/// Why a session was dropped without the user asking for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// The backend answered 401
    Unauthorized,
}

/// Session state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { slot: TokenSlot },
    LoggedOut,
    Invalidated(InvalidationReason),
}

pub struct SessionContext {
    persistent: Arc<dyn SessionStore>,
    scoped: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("persistent", &self.persistent.describe())
            .field("scoped", &self.scoped.describe())
            .finish()
    }
}

impl SessionContext {
    pub fn new(persistent: Arc<dyn SessionStore>, scoped: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            persistent,
            scoped,
            events,
        }
    }

    /// Both slots in memory; nothing survives the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// File-backed slots in the configured directories
    pub fn from_config(config: &SessionConfig) -> Self {
        let persistent = FileStore::in_dir(config.data_path());
        let scoped = FileStore::in_dir(config.session_path());
        debug!(persistent = %persistent.describe(), scoped = %scoped.describe(), "Session stores configured");
        Self::new(Arc::new(persistent), Arc::new(scoped))
    }

    fn store(&self, slot: TokenSlot) -> &Arc<dyn SessionStore> {
        match slot {
            TokenSlot::Persistent => &self.persistent,
            TokenSlot::Scoped => &self.scoped,
        }
    }

    fn other(&self, slot: TokenSlot) -> &Arc<dyn SessionStore> {
        match slot {
            TokenSlot::Persistent => &self.scoped,
            TokenSlot::Scoped => &self.persistent,
        }
    }

    /// Slot currently holding a token, persistent first
    pub fn token_slot(&self) -> Result<Option<TokenSlot>> {
        for slot in [TokenSlot::Persistent, TokenSlot::Scoped] {
            let token = self.store(slot).get(TOKEN_KEY)?;
            if token.is_some_and(|t| !t.is_empty()) {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    pub fn current_token(&self) -> Result<Option<String>> {
        for slot in [TokenSlot::Persistent, TokenSlot::Scoped] {
            if let Some(token) = self.store(slot).get(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.current_token()?.is_some())
    }

    /// Store a token in the slot picked by `remember`, evicting the other slot
    pub fn set_token(&self, token: &str, remember: bool) -> Result<()> {
        let slot = TokenSlot::from_remember(remember);
        self.store(slot).set(TOKEN_KEY, token)?;
        self.other(slot).remove(TOKEN_KEY)?;
        self.other(slot).remove(USER_KEY)?;

        info!(slot = ?slot, "Session token stored");
        let _ = self.events.send(SessionEvent::LoggedIn { slot });
        Ok(())
    }

    /// Cache the user record next to the token
    pub fn set_user(&self, user: &User, remember: bool) -> Result<()> {
        let serialized = serde_json::to_string(user)?;
        self.store(TokenSlot::from_remember(remember)).set(USER_KEY, &serialized)
    }

    /// Cache the user record in whichever slot holds the token
    pub fn remember_user(&self, user: &User) -> Result<()> {
        match self.token_slot()? {
            Some(slot) => self.set_user(user, slot == TokenSlot::Persistent),
            None => Ok(()),
        }
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        for slot in [TokenSlot::Persistent, TokenSlot::Scoped] {
            if let Some(raw) = self.store(slot).get(USER_KEY)? {
                match serde_json::from_str(&raw) {
                    Ok(user) => return Ok(Some(user)),
                    Err(e) => warn!(slot = ?slot, error = %e, "Cached user record is unreadable"),
                }
            }
        }
        Ok(None)
    }

    fn wipe(&self) -> Result<()> {
        for store in [&self.persistent, &self.scoped] {
            store.remove(TOKEN_KEY)?;
            store.remove(USER_KEY)?;
        }
        Ok(())
    }

    /// Log out: forget token and user in both slots
    pub fn clear(&self) -> Result<()> {
        self.wipe()?;
        info!("Session cleared");
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Drop the session because the backend no longer accepts it
    pub fn invalidate(&self, reason: InvalidationReason) -> Result<()> {
        self.wipe()?;
        warn!(reason = ?reason, "Session invalidated");
        let _ = self.events.send(SessionEvent::Invalidated(reason));
        Ok(())
    }

    /// Receive every session event from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            id: Some(7),
            name: "Budi Santoso".to_string(),
            email: "budi@student.telkomuniversity.ac.id".to_string(),
            role: role.to_string(),
            ..User::default()
        }
    }

    #[test]
    fn test_remember_picks_slot_and_evicts_other() {
        let session = SessionContext::in_memory();

        session.set_token("scoped-token", false).unwrap();
        assert_eq!(session.token_slot().unwrap(), Some(TokenSlot::Scoped));

        session.set_token("persistent-token", true).unwrap();
        assert_eq!(session.token_slot().unwrap(), Some(TokenSlot::Persistent));
        assert_eq!(session.current_token().unwrap().as_deref(), Some("persistent-token"));
        assert_eq!(session.scoped.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_persistent_slot_wins_on_read() {
        let session = SessionContext::in_memory();
        session.scoped.set(TOKEN_KEY, "scoped").unwrap();
        session.persistent.set(TOKEN_KEY, "persistent").unwrap();

        assert_eq!(session.current_token().unwrap().as_deref(), Some("persistent"));
    }

    #[test]
    fn test_user_follows_token_slot() {
        let session = SessionContext::in_memory();
        session.set_token("tok", false).unwrap();
        session.remember_user(&user("user")).unwrap();

        assert!(session.scoped.get(USER_KEY).unwrap().is_some());
        assert!(session.persistent.get(USER_KEY).unwrap().is_none());
        assert_eq!(session.current_user().unwrap().unwrap().name, "Budi Santoso");
    }

    #[test]
    fn test_invalidate_clears_both_slots_and_notifies() {
        let session = SessionContext::in_memory();
        let mut events = session.subscribe();

        session.persistent.set(TOKEN_KEY, "a").unwrap();
        session.scoped.set(TOKEN_KEY, "b").unwrap();
        session.set_user(&user("admin"), true).unwrap();
        session.set_user(&user("admin"), false).unwrap();

        session.invalidate(InvalidationReason::Unauthorized).unwrap();

        assert_eq!(session.current_token().unwrap(), None);
        assert_eq!(session.current_user().unwrap(), None);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Invalidated(InvalidationReason::Unauthorized)
        );
    }

    #[test]
    fn test_clear_emits_logged_out() {
        let session = SessionContext::in_memory();
        session.set_token("tok", true).unwrap();
        let mut events = session.subscribe();

        session.clear().unwrap();
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert!(!session.is_authenticated().unwrap());
    }
}
