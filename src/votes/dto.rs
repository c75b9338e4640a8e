use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for voting. `dir` is constrained to at most 1: exactly 1
/// casts a vote, any non-positive value removes one.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub post_id: Uuid,
    pub dir: i16,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub message: String,
}
