use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::Request,
    body::Body,
};
use tower_sessions::Session;

use crate::auth::SESSION_USER_KEY;
use crate::errors::response::notice_redirect;

// Gate for protected paths: anything without a session binding is sent to the
// login page before any handler (or the role guard) runs. Handlers still
// re-fetch the user fresh; this check is only session evidence.
pub async fn require_auth(
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if path == "/" || path == "/login" || path.starts_with("/static") {
        return next.run(req).await;
    }

    match session.get::<u64>(SESSION_USER_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        _ => notice_redirect("/login", "Please log in to continue.", "info").into_response(),
    }
}
