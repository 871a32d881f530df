use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the resume upload service (serves `POST /upload`).
    pub upload_service_url: String,
    /// Base URL of the matching service (serves `/person_details` and `/search_matches`).
    pub matching_service_url: String,
    /// Bearer token sent to the backend services. Static until the identity
    /// provider issues per-request access tokens.
    pub api_token: String,
    pub default_collection: String,
    pub auth_client_id: String,
    pub auth_authority: String,
    pub auth_redirect_uri: String,
    pub http_timeout_secs: u64,
    /// Idle time after which a page session is dropped.
    pub session_idle_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upload_service_url: require_env("UPLOAD_SERVICE_URL")?,
            matching_service_url: require_env("MATCHING_SERVICE_URL")?,
            api_token: env_or("API_TOKEN", "testjwt"),
            default_collection: env_or("DEFAULT_COLLECTION", "resumes"),
            auth_client_id: require_env("AUTH_CLIENT_ID")?,
            auth_authority: env_or("AUTH_AUTHORITY", "https://login.microsoftonline.com/common"),
            auth_redirect_uri: env_or("AUTH_REDIRECT_URI", "http://localhost:8080/"),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            session_idle_secs: env_or("SESSION_IDLE_SECS", "3600")
                .parse::<u64>()
                .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Configuration pointing both backends at a single test server.
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            upload_service_url: base_url.to_string(),
            matching_service_url: base_url.to_string(),
            api_token: "testjwt".to_string(),
            default_collection: "resumes".to_string(),
            auth_client_id: "test-client".to_string(),
            auth_authority: "https://login.example.com/common".to_string(),
            auth_redirect_uri: "http://localhost:8080/".to_string(),
            http_timeout_secs: 5,
            session_idle_secs: 600,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
