use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{LoginRequest, TokenResponse},
    jwt::JwtKeys,
    password::verify_password,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo::User;

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.username = payload.username.trim().to_lowercase();

    // Unknown email and bad password are indistinguishable to the client.
    let user = User::find_by_email(&state.db, &payload.username)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.username, "login unknown email");
            AppError::Unauthenticated
        })?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(email = %payload.username, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthenticated);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serialization() {
        let response = TokenResponse {
            access_token: "abc.def.ghi".into(),
            token_type: "bearer".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("access_token"));
        assert!(json.contains("bearer"));
    }
}
