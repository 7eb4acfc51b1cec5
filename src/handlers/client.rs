use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use std::collections::HashSet;

use crate::auth;
use crate::config::Config;
use crate::errors::AppResult;
use crate::errors::response::notice_redirect;
use crate::models::{non_empty, InvoiceStatus, NoticeParams, ProfileForm, ProjectStatus, Role};
use crate::services::StoreService;
use super::{escape_html, load_template, notice_html};

pub async fn client_dashboard(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;

    // Admins are redirected to their own dashboard rather than denied.
    if user.role == Role::Admin {
        return Ok(Redirect::to(auth::landing_for(Role::Admin)).into_response());
    }
    auth::authorize(&user, Role::Client)?;

    let mut projects = store.list_projects_for_user(user.id).await?;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total_projects = projects.len();
    let completed_projects = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .count();
    let active_projects = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::InProgress)
        .count();

    // Pending invoices for the client companies this user's projects belong to.
    let client_ids: HashSet<u64> = projects.iter().map(|p| p.client_id).collect();
    let pending_invoices = store
        .list_invoices()
        .await?
        .iter()
        .filter(|i| i.status == InvoiceStatus::Pending && client_ids.contains(&i.client_id))
        .count();

    let rows = projects
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&p.title),
                p.status.as_str(),
                p.priority.as_str(),
                p.end_date.map_or("-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let html = load_template("client/dashboard.html")?
        .replace("{{notice}}", &notice_html(&params))
        .replace("{{client_name}}", &escape_html(&user.display_name()))
        .replace("{{total_projects}}", &total_projects.to_string())
        .replace("{{completed_projects}}", &completed_projects.to_string())
        .replace("{{active_projects}}", &active_projects.to_string())
        .replace("{{pending_invoices}}", &pending_invoices.to_string())
        .replace("{{projects}}", &rows);

    Ok(Html(html).into_response())
}

// Profile is open to any authenticated role; updates only ever touch the
// caller's own row.
pub async fn serve_profile(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;

    let html = load_template("client/profile.html")?
        .replace("{{notice}}", &notice_html(&params))
        .replace("{{username}}", &escape_html(&user.username))
        .replace("{{email}}", &escape_html(&user.email))
        .replace("{{first_name}}", &escape_html(user.first_name.as_deref().unwrap_or("")))
        .replace("{{last_name}}", &escape_html(user.last_name.as_deref().unwrap_or("")))
        .replace("{{phone}}", &escape_html(user.phone.as_deref().unwrap_or("")));

    Ok(Html(html).into_response())
}

#[axum::debug_handler]
pub async fn handle_update_profile(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let mut user = auth::require_user(&session, &store).await?;

    user.first_name = non_empty(form.first_name);
    user.last_name = non_empty(form.last_name);
    user.phone = non_empty(form.phone);
    store.save_user(&user).await?;

    tracing::info!("User {} updated their profile", user.id);
    Ok(notice_redirect("/client/profile", "Profile updated successfully!", "success").into_response())
}
