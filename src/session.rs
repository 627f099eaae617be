use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::executor::Executor;
use crate::request::{ProxyConfig, Request};
use crate::response::ApiResponse;

/// Tokens are good for two hours from the most recent successful
/// authentication.
const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Fixed relative path of the authentication endpoint.
const AUTH_PATH: &str = "security/authenticate";

/// How the session authenticates against the API.
///
/// A tagged union rather than nullable fields: a session either carries a
/// pre-issued token or a user/password pair, never both and never neither.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Pre-issued bearer token; cannot be renewed once expired.
    Token(String),
    /// User/password pair exchanged for a token on demand.
    UserPassword { user: String, password: String },
}

/// `data` payload of the authentication endpoint's success body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthData {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default)]
struct TokenState {
    token: Option<String>,
    expires_at: Option<Instant>,
}

impl TokenState {
    fn is_valid(&self) -> bool {
        match (&self.token, self.expires_at) {
            (Some(token), Some(expires_at)) if !token.is_empty() => Instant::now() < expires_at,
            _ => false,
        }
    }
}

/// Cached credential state shared across calls to one configured backend.
///
/// The token and its expiry live behind an async mutex that is held across
/// the authentication call, so concurrent callers that both observe a stale
/// token collapse into a single refresh (single-flight). The session is
/// mutated in place on refresh, never replaced, and nothing outside this
/// type touches the token state.
pub struct Session {
    base_url: String,
    credentials: Credentials,
    proxy: Option<ProxyConfig>,
    state: Mutex<TokenState>,
}

impl std::fmt::Debug for Session {
    /// Intentionally does not display the token or password.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl Session {
    /// Create a session from a pre-issued token, valid for the full session
    /// lifetime from now.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            base_url: base_url.into(),
            credentials: Credentials::Token(token.clone()),
            proxy: None,
            state: Mutex::new(TokenState {
                token: Some(token),
                expires_at: Some(Instant::now() + SESSION_TTL),
            }),
        }
    }

    /// Create a session that authenticates with a user/password pair; the
    /// token is acquired lazily on first use.
    pub fn with_credentials(
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: Credentials::UserPassword {
                user: user.into(),
                password: password.into(),
            },
            proxy: None,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Route every call of this session (including authentication) through
    /// the given proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Create a session from environment variables.
    ///
    /// Expects:
    /// - `SW_BASE_URL`: base URL of the API (required)
    /// - `SW_TOKEN`: pre-issued token, or
    /// - `SW_USER` / `SW_PASSWORD`: user/password pair (required when no token)
    /// - `SW_PROXY_HOST` / `SW_PROXY_PORT`: optional, both or neither
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("SW_BASE_URL")
            .map_err(|_| ClientError::Config("SW_BASE_URL not set".into()))?;

        let mut session = match std::env::var("SW_TOKEN") {
            Ok(token) => Self::with_token(base_url, token),
            Err(_) => {
                let user = std::env::var("SW_USER")
                    .map_err(|_| ClientError::Config("neither SW_TOKEN nor SW_USER set".into()))?;
                let password = std::env::var("SW_PASSWORD")
                    .map_err(|_| ClientError::Config("SW_PASSWORD not set".into()))?;
                Self::with_credentials(base_url, user, password)
            }
        };

        match (
            std::env::var("SW_PROXY_HOST").ok(),
            std::env::var("SW_PROXY_PORT").ok(),
        ) {
            (Some(host), Some(port)) => {
                let port = port
                    .parse()
                    .map_err(|_| ClientError::Config("SW_PROXY_PORT is not a port".into()))?;
                session = session.proxy(ProxyConfig::new(host, port));
            }
            (None, None) => {}
            _ => {
                return Err(ClientError::Config(
                    "SW_PROXY_HOST and SW_PROXY_PORT must be set together".into(),
                ));
            }
        }
        Ok(session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn proxy_config(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    /// Current token, if one is cached (valid or not)
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    /// Whether the cached token is non-empty and unexpired
    pub async fn is_valid(&self) -> bool {
        self.state.lock().await.is_valid()
    }

    /// Drop the cached token so the next [`ensure_valid`](Self::ensure_valid)
    /// re-authenticates.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.token = None;
        state.expires_at = None;
    }

    /// Make sure the cached token is usable, authenticating if it is absent
    /// or expired.
    ///
    /// On a successful authentication the token and expiry are updated in
    /// place. On any non-success envelope the state is left unchanged; the
    /// caller observes continued staleness through [`is_valid`](Self::is_valid)
    /// rather than a propagated failure. The state lock is held across the
    /// authentication call, so concurrent stale observers perform exactly one
    /// authentication between them.
    pub async fn ensure_valid(&self) {
        let mut state = self.state.lock().await;
        // Re-check under the lock: another caller may have refreshed while
        // this one waited.
        if state.is_valid() {
            return;
        }

        let (user, password) = match &self.credentials {
            Credentials::UserPassword { user, password } => (user.as_str(), password.as_str()),
            Credentials::Token(_) => {
                // A pre-issued token carries no credentials to renew with.
                warn!("token expired and session has no user/password to re-authenticate");
                return;
            }
        };

        debug!(base_url = %self.base_url, "authenticating");
        let mut builder = Request::builder();
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        let request = builder.build();

        let body = serde_json::json!({ "user": user, "password": password }).to_string();
        let result: ApiResponse<AuthData> = Executor::new(&self.base_url)
            .post_json(AUTH_PATH, &request, &body, None)
            .await;

        if result.is_success() {
            if let Some(token) = result.data.and_then(|d| d.token) {
                state.token = Some(token);
                state.expires_at = Some(Instant::now() + SESSION_TTL);
                return;
            }
            warn!("authentication succeeded but returned no token");
            return;
        }
        warn!(
            message = result.message.as_deref().unwrap_or_default(),
            detail = result.message_detail.as_deref().unwrap_or_default(),
            "authentication failed, session stays stale"
        );
    }

    /// Build a request descriptor from the current session state: the
    /// session's proxy plus an `Authorization: Bearer` header when a token is
    /// cached.
    pub async fn request(&self) -> Result<Request, ClientError> {
        let mut builder = Request::builder();
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        if let Some(token) = self.token().await {
            builder = builder.bearer(&token)?;
        }
        Ok(builder.build())
    }
}
