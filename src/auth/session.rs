use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::identity::{Identity, Provider};

/// How long an issued OAuth `state` stays redeemable.
pub const LOGIN_STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone)]
struct SessionEntry {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PendingLogin {
    provider: Provider,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SessionTables {
    sessions: HashMap<Uuid, SessionEntry>,
    pending: HashMap<String, PendingLogin>,
}

/// Process-local session and login-state storage.
///
/// Expired entries are dropped lazily whenever they are looked at.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    tables: Arc<RwLock<SessionTables>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `identity`, returning its id.
    pub async fn open(&self, identity: Identity, ttl: Duration) -> Uuid {
        let sid = Uuid::new_v4();
        let entry = SessionEntry {
            identity,
            expires_at: Utc::now() + ttl,
        };

        let mut tables = self.tables.write().await;
        let now = Utc::now();
        tables.sessions.retain(|_, e| e.expires_at > now);
        tables.sessions.insert(sid, entry);
        sid
    }

    /// Identity bound to a live session, if any.
    pub async fn lookup(&self, sid: &Uuid) -> Option<Identity> {
        let now = Utc::now();
        {
            let tables = self.tables.read().await;
            match tables.sessions.get(sid) {
                Some(entry) if entry.expires_at > now => return Some(entry.identity.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop it
        self.tables.write().await.sessions.remove(sid);
        None
    }

    /// Revoke a session. Returns whether it existed.
    pub async fn revoke(&self, sid: &Uuid) -> bool {
        self.tables.write().await.sessions.remove(sid).is_some()
    }

    pub async fn active_sessions(&self) -> usize {
        let now = Utc::now();
        self.tables
            .read()
            .await
            .sessions
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    /// Issue a one-time OAuth `state` value for a login with `provider`.
    pub async fn issue_state(&self, provider: Provider) -> String {
        self.issue_state_with_ttl(provider, Duration::minutes(LOGIN_STATE_TTL_MINUTES))
            .await
    }

    pub async fn issue_state_with_ttl(&self, provider: Provider, ttl: Duration) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let pending = PendingLogin {
            provider,
            expires_at: Utc::now() + ttl,
        };

        let mut tables = self.tables.write().await;
        let now = Utc::now();
        tables.pending.retain(|_, p| p.expires_at > now);
        tables.pending.insert(state.clone(), pending);
        state
    }

    /// Redeem a `state`. Succeeds once, only for the provider it was issued for
    /// and only before it expires.
    pub async fn redeem_state(&self, state: &str, provider: Provider) -> bool {
        let mut tables = self.tables.write().await;
        match tables.pending.remove(state) {
            Some(pending) => pending.provider == provider && pending.expires_at > Utc::now(),
            None => false,
        }
    }
}
