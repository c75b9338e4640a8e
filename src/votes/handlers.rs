use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::votes::{
    dto::{VoteRequest, VoteResponse},
    services::{apply_vote, VoteOutcome},
};

pub fn vote_routes() -> Router<AppState> {
    Router::new().route("/votes", post(vote))
}

#[instrument(skip(state))]
pub async fn vote(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<VoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), AppError> {
    let outcome = apply_vote(&state.db, user_id, payload.post_id, payload.dir).await?;
    let message = match outcome {
        VoteOutcome::Added => "vote added",
        VoteOutcome::Removed => "vote removed",
    };
    Ok((
        StatusCode::CREATED,
        Json(VoteResponse {
            message: message.into(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_request_accepts_negative_directions() {
        let body: VoteRequest = serde_json::from_str(
            r#"{"post_id": "7f3b1f1e-0000-4000-8000-000000000000", "dir": -3}"#,
        )
        .unwrap();
        assert_eq!(body.dir, -3);
    }
}
