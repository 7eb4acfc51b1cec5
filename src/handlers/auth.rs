use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::auth;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::errors::response::notice_redirect;
use crate::models::{LoginForm, NoticeParams};
use crate::services::StoreService;
use super::{load_template, notice_html};

// Public landing page. Authenticated visitors go straight to their own
// dashboard instead.
pub async fn serve_index(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    if let Some(user) = auth::resolve(&session, &store).await? {
        return Ok(Redirect::to(auth::landing_for(user.role)).into_response());
    }

    let html = load_template("index.html")?.replace("{{notice}}", &notice_html(&params));
    Ok(Html(html).into_response())
}

pub async fn serve_login_page(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    // Already logged in: same landing mapping as a fresh login.
    if let Some(user) = auth::resolve(&session, &store).await? {
        return Ok(Redirect::to(auth::landing_for(user.role)).into_response());
    }

    let html = load_template("login.html")?.replace("{{notice}}", &notice_html(&params));
    Ok(Html(html).into_response())
}

#[axum::debug_handler]
pub async fn handle_login(
    State((store, config)): State<(StoreService, Config)>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Login attempt for {}", login_form.email);

    let user = store
        .find_user_by_email(&login_form.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.verify_password(&login_form.password) {
        tracing::info!("Invalid password for {}", login_form.email);
        return Err(AppError::InvalidCredentials);
    }

    if !user.active {
        tracing::warn!("Login attempt on deactivated account {}", user.id);
        return Err(AppError::AccountDeactivated);
    }

    let remember = login_form.remember.is_some();
    auth::establish(&session, &user, remember, config.session.remember_days).await?;

    Ok(notice_redirect(
        auth::landing_for(user.role),
        "Logged in successfully!",
        "success",
    )
    .into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(session: Session) -> AppResult<Response> {
    auth::terminate(&session).await?;
    Ok(notice_redirect("/login", "You have been logged out.", "info").into_response())
}
