use serde::{Deserialize, Serialize};

/// Request body for login. `username` carries the email, matching the
/// credential form the service has always accepted.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
