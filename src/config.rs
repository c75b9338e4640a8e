use jsonwebtoken::Algorithm;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let algorithm = std::env::var("JWT_ALGORITHM")
            .unwrap_or_else(|_| "HS256".into())
            .parse::<Algorithm>()
            .map_err(|e| anyhow::anyhow!("unsupported JWT_ALGORITHM: {e}"))?;
        // Keys are symmetric, so only the HMAC family is usable.
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            anyhow::bail!("JWT_ALGORITHM must be one of HS256, HS384, HS512");
        }
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            algorithm,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        Ok(Self { database_url, jwt })
    }
}
