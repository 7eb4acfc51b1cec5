use tower_sessions::{Expiry, Session};
use tower_sessions::cookie::time::{Duration, OffsetDateTime};

use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::services::StoreService;

// The only piece of identity the session holds. Everything else is
// re-fetched from the store on every request.
pub const SESSION_USER_KEY: &str = "auth_user_id";

// Bind this session to the user. With `remember` the cookie survives browser
// restarts for `remember_days`; otherwise it is cleared when the browser
// session ends.
pub async fn establish(
    session: &Session,
    user: &User,
    remember: bool,
    remember_days: i64,
) -> AppResult<()> {
    // Fresh session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    if remember {
        let until = OffsetDateTime::now_utc() + Duration::days(remember_days);
        session.set_expiry(Some(Expiry::AtDateTime(until)));
    } else {
        session.set_expiry(Some(Expiry::OnSessionEnd));
    }
    tracing::info!("Established session for user {}", user.id);
    Ok(())
}

// Resolve the session to a live identity, or Anonymous (None). The user row
// is re-fetched fresh each time so deactivation takes effect immediately; a
// stale binding is flushed rather than trusted.
pub async fn resolve(session: &Session, store: &StoreService) -> AppResult<Option<User>> {
    let user_id: Option<u64> = session
        .get(SESSION_USER_KEY)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    let Some(id) = user_id else {
        return Ok(None);
    };

    let user = validate_identity(store.find_user_by_id(id).await?);
    if user.is_none() {
        tracing::warn!("Session referenced missing or deactivated user {}", id);
        let _ = session.flush().await;
    }
    Ok(user)
}

// A fetched record only counts as an identity while its active flag holds.
// Deleted rows and deactivated accounts both resolve to Anonymous.
pub fn validate_identity(user: Option<User>) -> Option<User> {
    user.filter(|u| u.active)
}

// Invalidate the session binding. Idempotent: terminating an already-dead
// session is not an error, and a concurrent resolve simply sees Anonymous.
pub async fn terminate(session: &Session) -> AppResult<()> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(())
}

// Resolve or fail with Unauthenticated for handlers that require a login.
pub async fn require_user(session: &Session, store: &StoreService) -> AppResult<User> {
    resolve(session, store).await?.ok_or(AppError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::Utc;
    use tower_sessions::MemoryStore;
    use crate::models::Role;

    fn active_user(id: u64) -> User {
        User {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password_hash: String::new(),
            role: Role::Client,
            first_name: None,
            last_name: None,
            phone: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn test_session() -> Session {
        let store = Arc::new(MemoryStore::default());
        Session::new(None, store, None)
    }

    #[test]
    fn test_deactivated_user_resolves_to_anonymous() {
        let mut user = active_user(3);
        user.active = false;
        assert!(validate_identity(Some(user)).is_none());
    }

    #[test]
    fn test_missing_user_resolves_to_anonymous() {
        assert!(validate_identity(None).is_none());
    }

    #[test]
    fn test_active_user_resolves_to_self() {
        let resolved = validate_identity(Some(active_user(3))).unwrap();
        assert_eq!(resolved.id, 3);
    }

    #[tokio::test]
    async fn test_establish_binds_exactly_one_user_id() {
        let session = test_session();
        establish(&session, &active_user(7), false, 30).await.unwrap();

        let bound: Option<u64> = session.get(SESSION_USER_KEY).await.unwrap();
        assert_eq!(bound, Some(7));
    }

    #[tokio::test]
    async fn test_terminate_is_idempotent_and_clears_binding() {
        let session = test_session();
        establish(&session, &active_user(7), true, 30).await.unwrap();

        terminate(&session).await.unwrap();
        terminate(&session).await.unwrap();

        let bound: Option<u64> = session.get(SESSION_USER_KEY).await.unwrap();
        assert_eq!(bound, None);
    }
}
