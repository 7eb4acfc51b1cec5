use redis::{Client, AsyncCommands};
use std::sync::Arc;
use crate::models::{Client as ClientRecord, Invoice, Project, User};

// Persistent store access. Rows are whole-JSON values written with a single
// SET, so row updates are atomic (last write wins). Unique keys are enforced
// here, at the storage layer, with SET NX index keys.
pub struct StoreService {
    client: Arc<Client>,
}

impl StoreService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    // Monotonic row ids, one sequence per entity kind.
    pub async fn next_id(&self, kind: &str) -> Result<u64, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.incr(format!("seq:{}", kind), 1).await
    }

    pub async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let user_data: Option<String> = conn.get(format!("user:{}", id)).await?;
        Ok(user_data.map(|data| serde_json::from_str(&data).unwrap()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let id: Option<u64> = conn.get(format!("user:email:{}", email)).await?;
        match id {
            Some(id) => self.find_user_by_id(id).await,
            None => Ok(None),
        }
    }

    // Returns false when the email or username is already taken. Both index
    // keys are claimed with SET NX before the row is written; a half-claimed
    // pair is rolled back so a failed create leaves no index garbage.
    pub async fn create_user(&self, user: &User) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let email_key = format!("user:email:{}", user.email);
        let username_key = format!("user:username:{}", user.username);

        let email_claimed: bool = conn.set_nx(&email_key, user.id).await?;
        if !email_claimed {
            return Ok(false);
        }
        let username_claimed: bool = conn.set_nx(&username_key, user.id).await?;
        if !username_claimed {
            conn.del::<_, ()>(&email_key).await?;
            return Ok(false);
        }

        conn.set::<_, _, ()>(
            format!("user:{}", user.id),
            serde_json::to_string(user).unwrap(),
        )
        .await?;
        conn.sadd::<_, _, ()>("users", user.id).await?;
        Ok(true)
    }

    // Rewrites the whole row in one SET. Email and username never change in
    // any current flow, so the index keys stay valid.
    pub async fn save_user(&self, user: &User) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set(
            format!("user:{}", user.id),
            serde_json::to_string(user).unwrap(),
        )
        .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let ids: Vec<u64> = conn.smembers("users").await?;
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match self.find_user_by_id(id).await {
                Ok(Some(user)) => users.push(user),
                Ok(None) => tracing::warn!("User {} in index but row missing", id),
                Err(e) => tracing::error!("Failed to fetch user {}: {}", id, e),
            }
        }
        Ok(users)
    }

    pub async fn create_client(&self, record: &ClientRecord) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set::<_, _, ()>(
            format!("client:{}", record.id),
            serde_json::to_string(record).unwrap(),
        )
        .await?;
        conn.sadd("clients", record.id).await
    }

    pub async fn get_client(&self, id: u64) -> Result<Option<ClientRecord>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let data: Option<String> = conn.get(format!("client:{}", id)).await?;
        Ok(data.map(|data| serde_json::from_str(&data).unwrap()))
    }

    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let ids: Vec<u64> = conn.smembers("clients").await?;
        let mut clients = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_client(id).await {
                Ok(Some(client)) => clients.push(client),
                Ok(None) => tracing::warn!("Client {} in index but row missing", id),
                Err(e) => tracing::error!("Failed to fetch client {}: {}", id, e),
            }
        }
        Ok(clients)
    }

    pub async fn count_clients(&self) -> Result<u64, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.scard("clients").await
    }

    pub async fn create_project(&self, project: &Project) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set::<_, _, ()>(
            format!("project:{}", project.id),
            serde_json::to_string(project).unwrap(),
        )
        .await?;
        conn.sadd::<_, _, ()>("projects", project.id).await?;
        // Per-user index so client dashboards never scan the full table.
        conn.sadd(format!("projects:user:{}", project.user_id), project.id)
            .await
    }

    pub async fn get_project(&self, id: u64) -> Result<Option<Project>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let data: Option<String> = conn.get(format!("project:{}", id)).await?;
        Ok(data.map(|data| serde_json::from_str(&data).unwrap()))
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let ids: Vec<u64> = conn.smembers("projects").await?;
        self.fetch_projects(ids).await
    }

    pub async fn list_projects_for_user(&self, user_id: u64) -> Result<Vec<Project>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let ids: Vec<u64> = conn.smembers(format!("projects:user:{}", user_id)).await?;
        self.fetch_projects(ids).await
    }

    async fn fetch_projects(&self, ids: Vec<u64>) -> Result<Vec<Project>, redis::RedisError> {
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_project(id).await {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => tracing::warn!("Project {} in index but row missing", id),
                Err(e) => tracing::error!("Failed to fetch project {}: {}", id, e),
            }
        }
        Ok(projects)
    }

    pub async fn count_projects(&self) -> Result<u64, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.scard("projects").await
    }

    // Invoices are written by an external billing process; this core only
    // reads them for dashboard counts.
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let ids: Vec<u64> = conn.smembers("invoices").await?;
        let mut invoices = Vec::with_capacity(ids.len());
        for id in ids {
            let data: Option<String> = conn.get(format!("invoice:{}", id)).await?;
            match data {
                Some(data) => invoices.push(serde_json::from_str(&data).unwrap()),
                None => tracing::warn!("Invoice {} in index but row missing", id),
            }
        }
        Ok(invoices)
    }
}

impl Clone for StoreService {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}
