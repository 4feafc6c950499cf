//! Gateway configuration

/// Configuration for connecting to the record store.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store base URL (e.g., "http://localhost:8090")
    pub base_url: String,

    /// Auth token for the record store, if a user is signed in
    pub token: Option<String>,

    /// Id of the signed-in user. The token is opaque to this client, so
    /// the identity travels alongside it.
    pub auth_user_id: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            auth_user_id: None,
            timeout: 30,
        }
    }

    /// Set the auth token and the user id it belongs to
    pub fn with_auth(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.auth_user_id = Some(user_id.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Read configuration from the environment (`VERDURA_BASE_URL`,
    /// `VERDURA_TOKEN`, `VERDURA_USER_ID`), loading a `.env` file first
    /// when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url = std::env::var("VERDURA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8090".to_string());
        let mut config = Self::new(base_url);
        if let (Ok(token), Ok(user_id)) = (
            std::env::var("VERDURA_TOKEN"),
            std::env::var("VERDURA_USER_ID"),
        ) {
            config = config.with_auth(token, user_id);
        }
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8090")
    }
}
