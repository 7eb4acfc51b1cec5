mod auth;
mod admin;
mod client;

pub use auth::{handle_login, handle_logout, serve_index, serve_login_page};
pub use admin::{
    admin_clients, admin_dashboard, admin_projects, handle_add_client, handle_add_project,
    serve_add_client, serve_add_project,
};
pub use client::{client_dashboard, handle_update_profile, serve_profile};

use std::fs;
use crate::errors::AppResult;
use crate::models::NoticeParams;

pub(crate) fn load_template(name: &str) -> AppResult<String> {
    Ok(fs::read_to_string(format!("templates/{}", name))?)
}

// Render the read-once notice carried by the redirect, if any. Values come
// from the URL, so they are escaped before hitting the page.
pub(crate) fn notice_html(params: &NoticeParams) -> String {
    match &params.notice {
        Some(message) => {
            let level = params.level.as_deref().unwrap_or("info");
            let level = match level {
                "error" | "success" | "info" => level,
                _ => "info",
            };
            format!(
                r#"<div class="notice {}">{}</div>"#,
                level,
                escape_html(message)
            )
        }
        None => String::new(),
    }
}

pub(crate) fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_html_escapes_markup() {
        let params = NoticeParams {
            notice: Some("<script>alert(1)</script>".to_string()),
            level: Some("error".to_string()),
        };
        let html = notice_html(&params);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("class=\"notice error\""));
    }

    #[test]
    fn test_unknown_level_downgrades_to_info() {
        let params = NoticeParams {
            notice: Some("hello".to_string()),
            level: Some("\" onload=\"x".to_string()),
        };
        assert!(notice_html(&params).contains("class=\"notice info\""));
    }

    #[test]
    fn test_no_notice_renders_nothing() {
        assert_eq!(notice_html(&NoticeParams::default()), "");
    }
}
