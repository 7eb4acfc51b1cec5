use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;
use chrono::{NaiveDate, Utc};

use crate::auth;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::errors::response::notice_redirect;
use crate::models::{
    non_empty, Client, ClientForm, InvoiceStatus, NoticeParams, Project, ProjectForm,
    ProjectStatus, Role,
};
use crate::services::StoreService;
use super::{escape_html, load_template, notice_html};

pub async fn admin_dashboard(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    let total_clients = store.count_clients().await?;
    let total_projects = store.count_projects().await?;
    let pending_invoices = store
        .list_invoices()
        .await?
        .iter()
        .filter(|i| i.status == InvoiceStatus::Pending)
        .count();
    let active_users = store.list_users().await?.iter().filter(|u| u.active).count();

    let mut clients = store.list_clients().await?;
    clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    clients.truncate(5);

    let mut projects = store.list_projects().await?;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    projects.truncate(5);

    let recent_clients = clients
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&c.company_name),
                escape_html(&c.email),
                c.created_at.format("%Y-%m-%d"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let recent_projects = projects
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&p.title),
                p.status.as_str(),
                p.created_at.format("%Y-%m-%d"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let html = load_template("admin/dashboard.html")?
        .replace("{{notice}}", &notice_html(&params))
        .replace("{{admin_name}}", &escape_html(&user.display_name()))
        .replace("{{total_clients}}", &total_clients.to_string())
        .replace("{{total_projects}}", &total_projects.to_string())
        .replace("{{pending_invoices}}", &pending_invoices.to_string())
        .replace("{{active_users}}", &active_users.to_string())
        .replace("{{recent_clients}}", &recent_clients)
        .replace("{{recent_projects}}", &recent_projects);

    Ok(Html(html).into_response())
}

pub async fn admin_clients(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    let mut clients = store.list_clients().await?;
    clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let rows = clients
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:?}</td></tr>",
                escape_html(&c.company_name),
                escape_html(c.contact_person.as_deref().unwrap_or("-")),
                escape_html(&c.email),
                escape_html(c.industry.as_deref().unwrap_or("-")),
                c.status,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let html = load_template("admin/clients.html")?
        .replace("{{notice}}", &notice_html(&params))
        .replace("{{clients}}", &rows);

    Ok(Html(html).into_response())
}

pub async fn serve_add_client(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    let html = load_template("admin/add_client.html")?.replace("{{notice}}", &notice_html(&params));
    Ok(Html(html).into_response())
}

#[axum::debug_handler]
pub async fn handle_add_client(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Form(form): Form<ClientForm>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    if form.company_name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "Company name",
            redirect: "/admin/clients/new",
        });
    }
    if form.email.trim().is_empty() {
        return Err(AppError::Validation {
            field: "Email",
            redirect: "/admin/clients/new",
        });
    }

    let id = store.next_id("client").await?;
    // Owner reference from the session identity, never from the payload.
    let client = Client::from_form(id, form, user.id);
    store.create_client(&client).await?;

    tracing::info!("Admin {} created client {}", user.id, client.id);
    Ok(notice_redirect("/admin/clients", "Client added successfully!", "success").into_response())
}

pub async fn admin_projects(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    let mut projects = store.list_projects().await?;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let rows = projects
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&p.title),
                p.status.as_str(),
                p.priority.as_str(),
                p.budget.map_or("-".to_string(), |b| format!("{:.2}", b)),
                p.created_at.format("%Y-%m-%d"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let html = load_template("admin/projects.html")?
        .replace("{{notice}}", &notice_html(&params))
        .replace("{{projects}}", &rows);

    Ok(Html(html).into_response())
}

pub async fn serve_add_project(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Query(params): Query<NoticeParams>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    let client_options = store
        .list_clients()
        .await?
        .iter()
        .map(|c| format!(r#"<option value="{}">{}</option>"#, c.id, escape_html(&c.company_name)))
        .collect::<Vec<_>>()
        .join("\n");

    // Projects are assigned to client-role users only.
    let user_options = store
        .list_users()
        .await?
        .iter()
        .filter(|u| u.role == Role::Client && u.active)
        .map(|u| format!(r#"<option value="{}">{}</option>"#, u.id, escape_html(&u.display_name())))
        .collect::<Vec<_>>()
        .join("\n");

    let html = load_template("admin/add_project.html")?
        .replace("{{notice}}", &notice_html(&params))
        .replace("{{client_options}}", &client_options)
        .replace("{{user_options}}", &user_options);

    Ok(Html(html).into_response())
}

#[axum::debug_handler]
pub async fn handle_add_project(
    State((store, _config)): State<(StoreService, Config)>,
    session: Session,
    Form(form): Form<ProjectForm>,
) -> AppResult<Response> {
    let user = auth::require_user(&session, &store).await?;
    auth::authorize(&user, Role::Admin)?;

    if form.title.trim().is_empty() {
        return Err(AppError::Validation {
            field: "Title",
            redirect: "/admin/projects/new",
        });
    }

    store
        .get_client(form.client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {}", form.client_id)))?;

    let assignee = store
        .find_user_by_id(form.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", form.user_id)))?;
    if assignee.role != Role::Client {
        return Err(AppError::Validation {
            field: "A client-role assignee",
            redirect: "/admin/projects/new",
        });
    }

    let id = store.next_id("project").await?;
    let project = Project {
        id,
        title: form.title.trim().to_string(),
        description: non_empty(form.description),
        status: ProjectStatus::Pending,
        priority: form.priority,
        budget: parse_budget(&form.budget),
        start_date: parse_date(&form.start_date),
        end_date: parse_date(&form.end_date),
        client_id: form.client_id,
        user_id: form.user_id,
        created_at: Utc::now(),
    };
    store.create_project(&project).await?;

    tracing::info!("Admin {} created project {}", user.id, project.id);
    Ok(notice_redirect("/admin/projects", "Project added successfully!", "success").into_response())
}

// Blank or unparseable optional inputs mean "not set".
fn parse_budget(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|b| *b >= 0.0)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_budget_blank_and_negative() {
        assert_eq!(parse_budget(""), None);
        assert_eq!(parse_budget("  "), None);
        assert_eq!(parse_budget("-5"), None);
        assert_eq!(parse_budget("1200.50"), Some(1200.50));
    }

    #[test]
    fn test_parse_date_lenient() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(
            parse_date("2024-03-01"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }
}
