use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Post record in the database. `owner_id` is set at creation and never
/// updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: OffsetDateTime,
    pub owner_id: Uuid,
}

/// One row of the aggregate read: a post joined with its owner and the count
/// of votes referencing it. The vote side is a LEFT JOIN so posts without
/// votes are kept with a count of 0.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithVotes {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: OffsetDateTime,
    pub owner_id: Uuid,
    pub owner_email: String,
    pub owner_created_at: OffsetDateTime,
    pub votes: i64,
}

impl Post {
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        title: &str,
        content: &str,
        is_published: bool,
    ) -> sqlx::Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, is_published, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, is_published, created_at, owner_id
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(is_published)
        .bind(owner_id)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, is_published, created_at, owner_id
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Full-field update; the owner column is deliberately not touched.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: &str,
        content: &str,
        is_published: bool,
    ) -> sqlx::Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, content = $3, is_published = $4
            WHERE id = $1
            RETURNING id, title, content, is_published, created_at, owner_id
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(is_published)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl PostWithVotes {
    /// Posts whose title contains `search` (empty matches all), ordered by
    /// post id ascending, paginated by `limit`/`skip`.
    pub async fn list(
        db: &PgPool,
        limit: i64,
        skip: i64,
        search: &str,
    ) -> sqlx::Result<Vec<PostWithVotes>> {
        sqlx::query_as::<_, PostWithVotes>(
            r#"
            SELECT p.id, p.title, p.content, p.is_published, p.created_at, p.owner_id,
                   u.email AS owner_email, u.created_at AS owner_created_at,
                   COUNT(v.post_id) AS votes
            FROM posts p
            JOIN users u ON u.id = p.owner_id
            LEFT JOIN votes v ON v.post_id = p.id
            WHERE p.title LIKE '%' || $1 || '%'
            GROUP BY p.id, u.id
            ORDER BY p.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await
    }

    pub async fn get_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<PostWithVotes>> {
        sqlx::query_as::<_, PostWithVotes>(
            r#"
            SELECT p.id, p.title, p.content, p.is_published, p.created_at, p.owner_id,
                   u.email AS owner_email, u.created_at AS owner_created_at,
                   COUNT(v.post_id) AS votes
            FROM posts p
            JOIN users u ON u.id = p.owner_id
            LEFT JOIN votes v ON v.post_id = p.id
            WHERE p.id = $1
            GROUP BY p.id, u.id
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
