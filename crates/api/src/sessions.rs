//! Per-session record tables.
//!
//! Every browser session owns its own [`RecordTable`], seeded when the
//! session starts and dropped when it ends or goes idle. Sessions never see
//! each other's data.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tabula_core::records::RecordTable;
use tabula_core::types::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

/// State held for a single session.
pub struct Session {
    /// The session's private table.
    pub table: RecordTable,
    /// When the session was started.
    pub created_at: Timestamp,
    /// Last time any request touched the session. Drives idle expiry.
    pub last_seen_at: Timestamp,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            table: RecordTable::seeded(),
            created_at: now,
            last_seen_at: now,
        }
    }
}

/// Public view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub created_at: Timestamp,
    pub last_seen_at: Timestamp,
    pub row_count: usize,
}

impl SessionInfo {
    fn from_session(session_id: Uuid, session: &Session) -> Self {
        Self {
            session_id,
            created_at: session.created_at,
            last_seen_at: session.last_seen_at,
            row_count: session.table.len(),
        }
    }
}

/// Manages all live sessions.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` and shared through
/// [`AppState`](crate::state::AppState). Each method takes the lock once, so
/// an operation against a session's table is atomic.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session with a freshly seeded table.
    pub async fn create(&self) -> SessionInfo {
        let session_id = Uuid::new_v4();
        let session = Session::new();
        let info = SessionInfo::from_session(session_id, &session);
        self.sessions.write().await.insert(session_id, session);
        info
    }

    /// Describe a session, if it exists. Does not count as activity.
    pub async fn info(&self, session_id: Uuid) -> Option<SessionInfo> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|s| SessionInfo::from_session(session_id, s))
    }

    /// Whether `session_id` refers to a live session.
    pub async fn contains(&self, session_id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    /// End a session, discarding its table. Returns `false` if it did not exist.
    pub async fn end(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    /// Run `f` against the session's table and mark the session active.
    ///
    /// Returns `None` if the session does not exist.
    pub async fn with_table<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut RecordTable) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id)?;
        session.last_seen_at = Utc::now();
        Some(f(&mut session.table))
    }

    /// Drop every session whose last activity is before `cutoff`.
    ///
    /// Returns the number of sessions removed.
    pub async fn purge_idle(&self, cutoff: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen_at >= cutoff);
        before - sessions.len()
    }

    /// Return the current number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
