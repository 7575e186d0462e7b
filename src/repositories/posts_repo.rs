use async_trait::async_trait;
use sqlx::{postgres::PgRow, Postgres, QueryBuilder, Row};
use tracing::instrument;

use crate::{
    models::{
        posts::{NewPost, Post, UpdatePost},
        query::PostFilter,
        users::PublicUser,
    },
    Error, Result,
};

use super::PostgresRepo;

const POST_COLUMNS: &str = "p.id, p.title, p.body, p.user_id, p.created_at, p.updated_at";

// Every users column but password, aliased so they cannot clash with the post's.
const OWNER_COLUMNS: &str = "u.id AS owner_id, u.name AS owner_name, u.email AS owner_email, \
     u.created_at AS owner_created_at, u.updated_at AS owner_updated_at";

#[async_trait]
pub trait PostsRepository: Sync + Send {
    async fn create(&self, post: NewPost) -> Result<Post>;
    /// Reads attach the owner's public profile; the password never leaves the store.
    async fn find_all(&self, filter: PostFilter) -> Result<Vec<Post>>;
    async fn find_one(&self, filter: PostFilter) -> Result<Option<Post>>;
    /// Applies only the fields present in `changes`. Returns the number of rows changed.
    async fn update(&self, changes: UpdatePost, filter: PostFilter) -> Result<u64>;
    /// Returns the number of rows removed.
    async fn destroy(&self, filter: PostFilter) -> Result<u64>;
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    #[instrument(skip(self, post), fields(user_id = post.user_id))]
    async fn create(&self, post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, title, body, user_id, created_at, updated_at
            "#,
        )
        .bind(post.title)
        .bind(post.body)
        .bind(post.user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(post_id = post.id, "Post created");

        Ok(post)
    }

    #[instrument(skip(self))]
    async fn find_all(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let mut query = select_posts(&filter);
        let rows = query.build().fetch_all(&self.pool).await?;

        let posts = rows
            .iter()
            .map(post_from_row)
            .collect::<core::result::Result<Vec<_>, _>>()?;

        tracing::debug!(count = posts.len(), "Posts fetched");

        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: PostFilter) -> Result<Option<Post>> {
        let mut query = select_posts(&filter);
        let row = query.build().fetch_optional(&self.pool).await?;

        let post = row
            .map(|row| post_from_row(&row))
            .transpose()?;

        tracing::debug!(post_found = post.is_some(), "Post query completed");

        Ok(post)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, changes: UpdatePost, filter: PostFilter) -> Result<u64> {
        ensure_scoped(&filter)?;

        let mut query = update_posts(&changes, &filter);
        let result = query.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn destroy(&self, filter: PostFilter) -> Result<u64> {
        ensure_scoped(&filter)?;

        let mut query = delete_posts(&filter);
        let result = query.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}

fn ensure_scoped(filter: &PostFilter) -> Result<()> {
    if filter.is_empty() {
        tracing::warn!("Rejected posts mutation without a filter");
        return Err(Error::BadRequest(
            "Refusing to modify posts without a filter".to_string(),
        ));
    }
    Ok(())
}

fn push_filter(query: &mut QueryBuilder<'static, Postgres>, filter: &PostFilter, prefix: &str) {
    if filter.is_empty() {
        return;
    }

    query.push(" WHERE ");
    let mut conditions = query.separated(" AND ");
    if let Some(id) = filter.id {
        conditions.push(format!("{prefix}id = "));
        conditions.push_bind_unseparated(id);
    }
    if let Some(user_id) = filter.user_id {
        conditions.push(format!("{prefix}user_id = "));
        conditions.push_bind_unseparated(user_id);
    }
}

fn select_posts(filter: &PostFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query
        .push(POST_COLUMNS)
        .push(", ")
        .push(OWNER_COLUMNS)
        .push(" FROM posts p LEFT JOIN users u ON u.id = p.user_id");

    push_filter(&mut query, filter, "p.");
    query
}

fn update_posts(changes: &UpdatePost, filter: &PostFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE posts SET title = COALESCE(");
    query
        .push_bind(changes.title.clone())
        .push(", title), body = COALESCE(")
        .push_bind(changes.body.clone())
        .push(", body), updated_at = NOW()");

    push_filter(&mut query, filter, "");
    query
}

fn delete_posts(filter: &PostFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("DELETE FROM posts");
    push_filter(&mut query, filter, "");
    query
}

fn post_from_row(row: &PgRow) -> core::result::Result<Post, sqlx::Error> {
    // LEFT JOIN: a missing owner row comes back as NULL owner columns.
    let user = match row.try_get::<Option<i32>, _>("owner_id")? {
        Some(id) => Some(PublicUser {
            id,
            name: row.try_get("owner_name")?,
            email: row.try_get("owner_email")?,
            created_at: row.try_get("owner_created_at")?,
            updated_at: row.try_get("owner_updated_at")?,
        }),
        None => None,
    };

    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        user,
    })
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn changes(title: Option<&str>, body: Option<&str>) -> UpdatePost {
        UpdatePost {
            title: title.map(str::to_string),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn select_joins_owner_without_password() {
        let query = select_posts(&PostFilter::by_id(7));
        let sql = query.sql();

        assert!(sql.starts_with("SELECT p.id, p.title, p.body, p.user_id"));
        assert!(sql.contains("LEFT JOIN users u ON u.id = p.user_id"));
        assert!(sql.contains("u.name AS owner_name"));
        assert!(!sql.contains("password"));
        assert!(sql.ends_with(" WHERE p.id = $1"));
    }

    #[test]
    fn select_all_has_no_where_clause() {
        let query = select_posts(&PostFilter::default());

        assert!(!query.sql().contains("WHERE"));
        assert!(!query.sql().contains("ORDER BY"));
    }

    #[test]
    fn update_keeps_absent_fields_and_is_scoped_by_id_and_owner() {
        let query = update_posts(&changes(Some("Only title"), None), &PostFilter::owned(1, 2));

        assert_eq!(
            query.sql(),
            "UPDATE posts SET title = COALESCE($1, title), body = COALESCE($2, body), \
             updated_at = NOW() WHERE id = $3 AND user_id = $4"
        );
    }

    #[test]
    fn delete_is_scoped_by_id_and_owner() {
        let query = delete_posts(&PostFilter::owned(1, 2));

        assert_eq!(query.sql(), "DELETE FROM posts WHERE id = $1 AND user_id = $2");
    }

    #[tokio::test]
    async fn unscoped_mutations_are_rejected_before_reaching_the_database() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/posts")
            .unwrap();
        let repo = PostgresRepo::new(pool);

        let destroyed = repo.destroy(PostFilter::default()).await;
        assert!(matches!(destroyed, Err(Error::BadRequest(_))));

        let updated = repo
            .update(changes(Some("Updated Post"), None), PostFilter::default())
            .await;
        assert!(matches!(updated, Err(Error::BadRequest(_))));
    }
}
