use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::posts::repo::PostWithVotes;
use crate::users::dto::PublicUser;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
}

/// Full-field update; every field is replaced.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub search: String,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: OffsetDateTime,
    pub owner_id: Uuid,
    pub owner: PublicUser,
}

/// A post annotated with its vote count.
#[derive(Debug, Serialize)]
pub struct PostWithVotesResponse {
    pub post: PostResponse,
    pub votes: i64,
}

impl From<PostWithVotes> for PostWithVotesResponse {
    fn from(row: PostWithVotes) -> Self {
        Self {
            post: PostResponse {
                id: row.id,
                title: row.title,
                content: row.content,
                is_published: row.is_published,
                created_at: row.created_at,
                owner_id: row.owner_id,
                owner: PublicUser {
                    id: row.owner_id,
                    email: row.owner_email,
                    created_at: row.owner_created_at,
                },
            },
            votes: row.votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.skip, 0);
        assert_eq!(params.search, "");
    }

    #[test]
    fn list_params_explicit_values() {
        let params: ListParams =
            serde_json::from_str(r#"{"limit": 5, "skip": 20, "search": "hello"}"#).unwrap();
        assert_eq!(params.limit, 5);
        assert_eq!(params.skip, 20);
        assert_eq!(params.search, "hello");
    }

    #[test]
    fn create_request_defaults_to_unpublished() {
        let body: CreatePostRequest =
            serde_json::from_str(r#"{"title": "Hello", "content": "World"}"#).unwrap();
        assert!(!body.is_published);
    }

    #[test]
    fn zero_vote_rows_map_to_count_zero() {
        let row = PostWithVotes {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            content: "World".into(),
            is_published: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
            owner_id: Uuid::new_v4(),
            owner_email: "alice@example.com".into(),
            owner_created_at: OffsetDateTime::UNIX_EPOCH,
            votes: 0,
        };
        let response = PostWithVotesResponse::from(row);
        assert_eq!(response.votes, 0);
        assert_eq!(response.post.owner.email, "alice@example.com");
    }
}
