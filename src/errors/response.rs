use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use urlencoding;
use crate::auth::landing_for;
use crate::errors::AppError;

// Redirect carrying a read-once notice for the next rendered view.
// This is the notification channel: (message, severity) as query params.
pub fn notice_redirect(path: &str, message: &str, level: &str) -> Redirect {
    Redirect::to(&format!(
        "{}?notice={}&level={}",
        path,
        urlencoding::encode(message),
        level
    ))
}

// The IntoResponse trait implementation converts AppError into a well-formed HTTP response.
// Every recoverable variant becomes a notice-carrying redirect; only store and
// template failures surface as raw status codes.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidCredentials | AppError::AccountDeactivated => {
                notice_redirect("/login", &self.to_string(), "error").into_response()
            }

            AppError::Unauthenticated => {
                notice_redirect("/login", &self.to_string(), "info").into_response()
            }

            // Denied identities land on their own dashboard, not the page
            // they were denied.
            AppError::Forbidden { role } => {
                notice_redirect(landing_for(role), "Access denied.", "error").into_response()
            }

            AppError::Validation { redirect, .. } => {
                let msg = self.to_string();
                notice_redirect(redirect, &msg, "error").into_response()
            }

            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} not found", what)).into_response()
            }

            // Store connectivity is the one fatal category: a generic 503,
            // never masked as a login failure.
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable",
                )
                    .into_response()
            }

            AppError::Session(msg) => {
                tracing::error!("Session error: {}", msg);
                notice_redirect("/login", "Please log in to continue.", "info").into_response()
            }

            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use crate::models::Role;

    fn location_of(response: Response) -> String {
        response
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_notice_redirect_encodes_message() {
        let response = notice_redirect("/login", "Logged in successfully!", "success")
            .into_response();
        assert_eq!(
            location_of(response),
            "/login?notice=Logged%20in%20successfully%21&level=success"
        );
    }

    #[test]
    fn test_invalid_credentials_redirects_to_login() {
        let response = AppError::InvalidCredentials.into_response();
        let location = location_of(response);
        assert!(location.starts_with("/login?notice="));
        assert!(location.ends_with("&level=error"));
    }

    #[test]
    fn test_forbidden_redirects_to_denied_identitys_landing() {
        let response = AppError::Forbidden { role: Role::Client }.into_response();
        assert!(location_of(response).starts_with("/client/dashboard?notice="));

        let response = AppError::Forbidden { role: Role::Admin }.into_response();
        assert!(location_of(response).starts_with("/admin/dashboard?notice="));
    }

    #[test]
    fn test_store_error_is_service_unavailable() {
        let err = AppError::Store(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
