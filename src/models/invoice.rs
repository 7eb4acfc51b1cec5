use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

// Minimal schema: dashboards only read invoices for status counts.
// client_id refers to a Client row, not a User row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Invoice {
    pub id: u64,
    pub client_id: u64,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}
