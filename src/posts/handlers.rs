use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::AppError;
use crate::posts::{
    dto::{CreatePostRequest, ListParams, PostWithVotesResponse, UpdatePostRequest},
    repo::{Post, PostWithVotes},
};
use crate::state::AppState;

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
}

/// Mutation is allowed only for the post's owner. Reads need authentication
/// but not ownership.
pub(crate) fn ensure_owner(post: &Post, user_id: Uuid) -> Result<(), AppError> {
    if post.owner_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = Post::create(
        &state.db,
        user_id,
        &payload.title,
        &payload.content,
        payload.is_published,
    )
    .await?;
    info!(post_id = %post.id, owner_id = %user_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(p): Query<ListParams>,
) -> Result<Json<Vec<PostWithVotesResponse>>, AppError> {
    let rows = PostWithVotes::list(&state.db, p.limit, p.skip, &p.search).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostWithVotesResponse>, AppError> {
    let row = PostWithVotes::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    if let Err(e) = ensure_owner(&post, user_id) {
        warn!(post_id = %id, owner_id = %post.owner_id, %user_id, "update denied");
        return Err(e);
    }

    let updated = Post::update(
        &state.db,
        id,
        &payload.title,
        &payload.content,
        payload.is_published,
    )
    .await?;
    info!(post_id = %id, %user_id, "post updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    if let Err(e) = ensure_owner(&post, user_id) {
        warn!(post_id = %id, owner_id = %post.owner_id, %user_id, "delete denied");
        return Err(e);
    }

    Post::delete(&state.db, id).await?;
    info!(post_id = %id, %user_id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn post_owned_by(owner_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            content: "World".into(),
            is_published: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            owner_id,
        }
    }

    #[test]
    fn owner_may_mutate() {
        let owner = Uuid::new_v4();
        let post = post_owned_by(owner);
        assert!(ensure_owner(&post, owner).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let post = post_owned_by(Uuid::new_v4());
        let other = Uuid::new_v4();
        assert!(matches!(
            ensure_owner(&post, other),
            Err(AppError::Forbidden)
        ));
    }
}
