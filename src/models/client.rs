use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::forms::ClientForm;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Client {
    pub id: u64,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub status: ClientStatus,
    pub admin_id: u64,  // owner reference, always the authenticated admin
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    // The owner reference comes from the session, never from the form; the
    // form struct has no admin_id field to spoof.
    pub fn from_form(id: u64, form: ClientForm, admin_id: u64) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_name: form.company_name.trim().to_string(),
            contact_person: non_empty(form.contact_person),
            email: form.email.trim().to_string(),
            phone: non_empty(form.phone),
            address: non_empty(form.address),
            industry: non_empty(form.industry),
            status: ClientStatus::Active,
            admin_id,
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> ClientForm {
        ClientForm {
            company_name: "Acme Corp".to_string(),
            contact_person: "Jane Smith".to_string(),
            email: "contact@acme.example".to_string(),
            phone: "".to_string(),
            address: "  ".to_string(),
            industry: "Manufacturing".to_string(),
        }
    }

    #[test]
    fn test_owner_reference_comes_from_session_identity() {
        let client = Client::from_form(42, sample_form(), 7);
        assert_eq!(client.admin_id, 7);
        assert_eq!(client.id, 42);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let client = Client::from_form(1, sample_form(), 7);
        assert_eq!(client.phone, None);
        assert_eq!(client.address, None);
        assert_eq!(client.contact_person.as_deref(), Some("Jane Smith"));
    }

    #[test]
    fn test_new_clients_start_active() {
        let client = Client::from_form(1, sample_form(), 7);
        assert_eq!(client.status, ClientStatus::Active);
    }
}
