//! User repository: resolves session subjects to identities.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use vistream_core::models::{Identity, UserRole};
use vistream_core::AppError;

/// Lookup of authenticated users by their OAuth open id.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_open_id(&self, open_id: &str) -> Result<Option<Identity>, AppError>;
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    open_id: String,
    name: Option<String>,
    role: String,
}

impl UserRow {
    fn into_identity(self) -> Identity {
        let role = match self.role.as_str() {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        };
        Identity {
            user_id: self.id,
            open_id: self.open_id,
            name: self.name,
            role,
        }
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    #[tracing::instrument(skip(self), fields(db.table = "users"))]
    async fn find_by_open_id(&self, open_id: &str) -> Result<Option<Identity>, AppError> {
        let row: Option<UserRow> = sqlx::query_as::<Postgres, UserRow>(
            "SELECT id, open_id, name, role FROM users WHERE open_id = $1 LIMIT 1",
        )
        .bind(open_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_identity))
    }
}
