use async_trait::async_trait;
use tracing::instrument;

use crate::{models::users::PublicUser, Result};

use super::PostgresRepo;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_public_user(&self, user_id: i32) -> Result<Option<PublicUser>>;
}

#[async_trait]
impl UserRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn find_public_user(&self, user_id: i32) -> Result<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        tracing::info!(user_found = user.is_some(), "User query completed");

        Ok(user)
    }
}
