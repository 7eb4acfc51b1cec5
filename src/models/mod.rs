mod user;
mod client;
mod project;
mod invoice;
mod forms;

pub use user::{Role, User};
pub use client::{Client, ClientStatus};
pub(crate) use client::non_empty;
pub use project::{Priority, Project, ProjectStatus};
pub use invoice::{Invoice, InvoiceStatus};
pub use forms::{ClientForm, LoginForm, NoticeParams, ProfileForm, ProjectForm};
