//! In-memory collaborator fakes shared by the session tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use plotline_cache::CacheManager;
use plotline_cache::memory::MemoryCacheProvider;
use plotline_core::config::auth::AuthConfig;
use plotline_core::config::cache::MemoryCacheConfig;
use plotline_core::config::session::SessionConfig;
use plotline_core::error::AppError;
use plotline_core::result::AppResult;
use plotline_core::traits::{SessionPersistence, UserDirectory};
use plotline_entity::session::{NewSession, Session};
use plotline_entity::user::{User, UserRole};

use crate::geo::NullIpLocator;
use crate::jwt::{AccessTokenDecoder, TokenIssuer};

use super::cache::SessionCache;
use super::lifecycle::SessionLifecycle;
use super::policy::SessionPolicy;
use super::store::SessionStore;
use super::verifier::Verifier;

/// In-memory `SessionPersistence` with an injectable rotation failure.
#[derive(Debug, Default)]
pub(crate) struct MemorySessions {
    rows: Mutex<Vec<Session>>,
    fail_next_rotate: AtomicBool,
}

impl MemorySessions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes the next `rotate` call fail after the point of no return
    /// would have been reached in a non-transactional implementation.
    pub fn fail_next_rotate(&self) {
        self.fail_next_rotate.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn stored(new: &NewSession) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            refresh_token: new.refresh_token.clone(),
            ip: new.ip.clone(),
            user_agent: new.user_agent.clone(),
            fingerprint: new.fingerprint.clone(),
            expires_at: new.expires_at,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl SessionPersistence for MemorySessions {
    async fn create(&self, session: &NewSession) -> AppResult<Session> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.refresh_token == session.refresh_token) {
            return Err(AppError::persistence(
                "Refresh token collides with an existing session",
            ));
        }
        let stored = Self::stored(session);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<Session>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.refresh_token == token).cloned())
    }

    async fn delete_by_refresh_token(&self, token: &str) -> AppResult<Option<Uuid>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter().position(|r| r.refresh_token == token) {
            Some(pos) => Ok(Some(rows.remove(pos).user_id)),
            None => Ok(None),
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }

    async fn count_active(&self, user_id: Uuid) -> AppResult<i64> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.user_id == user_id && r.is_active())
            .count() as i64)
    }

    async fn list_active(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let rows = self.rows.lock().unwrap();
        let mut active: Vec<Session> = rows
            .iter()
            .filter(|r| r.user_id == user_id && r.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn rotate(
        &self,
        old_refresh_token: &str,
        new_session: &NewSession,
    ) -> AppResult<Session> {
        if self.fail_next_rotate.swap(false, Ordering::SeqCst) {
            return Err(AppError::persistence("Injected rotation failure"));
        }
        let mut rows = self.rows.lock().unwrap();
        let pos = rows
            .iter()
            .position(|r| r.refresh_token == old_refresh_token)
            .ok_or_else(|| AppError::not_found("Session already consumed"))?;
        rows.remove(pos);
        let stored = Self::stored(new_session);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn delete_expired(&self) -> AppResult<Vec<Uuid>> {
        let mut rows = self.rows.lock().unwrap();
        let mut owners = Vec::new();
        rows.retain(|r| {
            if r.is_expired() {
                owners.push(r.user_id);
                false
            } else {
                true
            }
        });
        Ok(owners)
    }
}

/// In-memory `UserDirectory`.
#[derive(Debug, Default)]
pub(crate) struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, user: User) {
        self.rows.lock().unwrap().push(user);
    }

    pub fn notification_token_of(&self, user_id: Uuid) -> Option<String> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|u| u.id == user_id)
            .and_then(|u| u.notification_token.clone())
    }

    pub fn last_login_of(&self, user_id: Uuid) -> Option<DateTime<Utc>> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|u| u.id == user_id).and_then(|u| u.last_login_at)
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn clear_notification_token(&self, user_id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(user) = rows.iter_mut().find(|u| u.id == user_id) {
            user.notification_token = None;
        }
        Ok(())
    }

    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(user) = rows.iter_mut().find(|u| u.id == user_id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

/// A reader with a remembered notification token.
pub(crate) fn user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: String::new(),
        display_name: Some("Test Reader".to_string()),
        role: UserRole::Author,
        notification_token: Some("device-token".to_string()),
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn new_session(user_id: Uuid, fingerprint: &str) -> NewSession {
    NewSession {
        user_id,
        refresh_token: Uuid::new_v4().to_string(),
        ip: "203.0.113.7".to_string(),
        user_agent: Some("Mozilla/5.0".to_string()),
        fingerprint: fingerprint.to_string(),
        expires_at: Utc::now() + Duration::days(30),
    }
}

pub(crate) fn expired_session(user_id: Uuid, fingerprint: &str) -> NewSession {
    NewSession {
        expires_at: Utc::now() - Duration::minutes(5),
        ..new_session(user_id, fingerprint)
    }
}

fn memory_cache() -> Arc<CacheManager> {
    let provider = MemoryCacheProvider::new(
        &MemoryCacheConfig {
            max_capacity: 1000,
            time_to_live_seconds: 60,
        },
        60,
    );
    Arc::new(CacheManager::from_provider(Arc::new(provider)))
}

/// Store over fresh in-memory persistence and cache.
pub(crate) fn store() -> (SessionStore, Arc<MemorySessions>, SessionCache) {
    let sessions = MemorySessions::new();
    let cache = SessionCache::new(memory_cache(), &SessionConfig::default());
    let store = SessionStore::new(
        Arc::clone(&sessions) as Arc<dyn SessionPersistence>,
        cache.clone(),
    );
    (store, sessions, cache)
}

/// Fully wired lifecycle over in-memory collaborators.
pub(crate) struct Harness {
    pub lifecycle: SessionLifecycle,
    pub store: Arc<SessionStore>,
    pub sessions: Arc<MemorySessions>,
    pub users: Arc<MemoryUsers>,
    pub user: User,
    pub decoder: AccessTokenDecoder,
}

pub(crate) fn harness() -> Harness {
    let (store, sessions, _cache) = store();
    let store = Arc::new(store);

    let users = MemoryUsers::new();
    let test_user = user("reader@example.com");
    users.insert(test_user.clone());

    let session_config = SessionConfig::default();
    let auth_config = AuthConfig::default();

    let lifecycle = SessionLifecycle::new(
        Arc::clone(&store),
        SessionPolicy::new(Arc::clone(&store), &session_config),
        Verifier::new(),
        Arc::new(TokenIssuer::new(&auth_config)),
        Arc::clone(&users) as Arc<dyn UserDirectory>,
        Arc::new(NullIpLocator),
        session_config,
    );

    Harness {
        lifecycle,
        store,
        sessions,
        users,
        user: test_user,
        decoder: AccessTokenDecoder::new(&auth_config),
    }
}
