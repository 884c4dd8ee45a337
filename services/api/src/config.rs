/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session-claim JWTs.
    pub jwt_secret: String,
    /// TCP port to listen on (default 5000). Env var: `API_PORT`.
    pub api_port: u16,
    /// SMTP relay hostname.
    pub smtp_host: String,
    /// SMTP port (default 587). Env var: `SMTP_PORT`.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password (app password for most relays).
    pub smtp_password: String,
    /// From address for transactional mail, e.g. `TeamSync <no-reply@example.com>`.
    pub mail_from: String,
    /// Chat-completion API key. Absent disables the assistant; the support
    /// endpoint then answers with its fallback text.
    pub openai_api_key: Option<String>,
    /// Chat-completion API base URL (default `https://api.openai.com/v1`).
    pub openai_base_url: String,
    /// Chat-completion model name (default `gpt-3.5-turbo`).
    pub openai_model: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            smtp_host: std::env::var("SMTP_HOST").expect("SMTP_HOST"),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_username: std::env::var("SMTP_USERNAME").expect("SMTP_USERNAME"),
            smtp_password: std::env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_owned()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_owned()),
        }
    }
}
