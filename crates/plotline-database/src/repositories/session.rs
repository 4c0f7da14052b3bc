//! Session repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use plotline_core::error::{AppError, ErrorKind};
use plotline_core::result::AppResult;
use plotline_core::traits::SessionPersistence;
use plotline_entity::session::{NewSession, Session};

/// PostgreSQL-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionPersistence for SessionRepository {
    async fn create(&self, session: &NewSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, refresh_token, ip, user_agent, fingerprint, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(session.user_id)
        .bind(&session.refresh_token)
        .bind(&session.ip)
        .bind(&session.user_agent)
        .bind(&session.fingerprint)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE refresh_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    "Failed to find session by refresh token",
                    e,
                )
            })
    }

    async fn delete_by_refresh_token(&self, token: &str) -> AppResult<Option<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM sessions WHERE refresh_token = $1 RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to delete session", e))
    }

    async fn delete_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to delete user sessions", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn count_active(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to count active sessions", e)
        })
    }

    async fn list_active(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 AND expires_at > NOW() \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to list active sessions", e)
        })
    }

    async fn rotate(
        &self,
        old_refresh_token: &str,
        new_session: &NewSession,
    ) -> AppResult<Session> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to begin transaction", e)
        })?;

        let deleted = sqlx::query("DELETE FROM sessions WHERE refresh_token = $1")
            .bind(old_refresh_token)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to consume session", e)
            })?;

        // A concurrent rotation already consumed the token; dropping the
        // transaction rolls back.
        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found("Session already consumed"));
        }

        let created = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, refresh_token, ip, user_agent, fingerprint, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(new_session.user_id)
        .bind(&new_session.refresh_token)
        .bind(&new_session.ip)
        .bind(&new_session.user_agent)
        .bind(&new_session.fingerprint)
        .bind(new_session.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to commit rotation", e)
        })?;

        Ok(created)
    }

    async fn delete_expired(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM sessions WHERE expires_at <= NOW() RETURNING user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to delete expired sessions", e)
        })
    }
}

/// Map an insert failure, surfacing refresh-token collisions distinctly.
///
/// With UUID-class token entropy a collision is vanishingly unlikely, but
/// the unique constraint is the one invariant the database enforces and a
/// violation must not be folded into a generic failure message.
fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::with_source(
                ErrorKind::Persistence,
                "Refresh token collides with an existing session",
                e,
            );
        }
    }
    AppError::with_source(ErrorKind::Persistence, "Failed to create session", e)
}
