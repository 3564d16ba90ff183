use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    /// Absent means: run on the in-memory store (local development).
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub session_secret: String,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok();
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let session_secret = match env::var("SESSION_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("SESSION_SECRET not set, using an insecure default");
                "default_secret_key".to_string()
            }
        };
        let session_ttl_days = env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            bind_addr,
            session_secret,
            session_ttl_days,
        })
    }
}
