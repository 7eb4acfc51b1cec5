use serde::Deserialize;
use super::project::Priority;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    // Checkbox: present only when ticked.
    pub remember: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientForm {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub industry: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    // Free-text number and date inputs arrive as strings; parsed leniently
    // in the handler so a blank field means "not set", not a 422.
    pub budget: String,
    pub start_date: String,
    pub end_date: String,
    pub client_id: u64,
    pub user_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct NoticeParams {
    pub notice: Option<String>,
    pub level: Option<String>,
}
