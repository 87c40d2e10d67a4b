use kuler_core::query::FeedUrls;

/// Errors raised while reading relay configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Relay configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Kuler API key appended to every upstream request.
    pub api_key: String,
    /// Hosts allowed in the `Referer` header. Empty allows every caller.
    pub allowed_domains: Vec<String>,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Overall HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timeout of the upstream feed fetch in seconds (default: `20`).
    pub upstream_timeout_secs: u64,
    /// Upstream feeds the relay is willing to forward to.
    pub feed_urls: FeedUrls,
}

impl RelayConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `KULER_API_KEY`         | required                   |
    /// | `RELAY_ALLOWED_DOMAINS` | empty (no Referer check)   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `UPSTREAM_TIMEOUT_SECS` | `20`                       |
    /// | `KULER_THEMES_URL`      | public theme list feed     |
    /// | `KULER_SEARCH_URL`      | public search feed         |
    /// | `KULER_COMMENTS_URL`    | public comments feed       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_var("PORT", "3000", "u16")?;

        let api_key = std::env::var("KULER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("KULER_API_KEY"))?;

        let allowed_domains = list_var("RELAY_ALLOWED_DOMAINS", "");
        let cors_origins = list_var("CORS_ORIGINS", "http://localhost:5173");

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", "30", "u64")?;
        let upstream_timeout_secs = parse_var("UPSTREAM_TIMEOUT_SECS", "20", "u64")?;

        let defaults = FeedUrls::default();
        let feed_urls = FeedUrls {
            themes: std::env::var("KULER_THEMES_URL").unwrap_or(defaults.themes),
            search: std::env::var("KULER_SEARCH_URL").unwrap_or(defaults.search),
            comments: std::env::var("KULER_COMMENTS_URL").unwrap_or(defaults.comments),
        };

        Ok(Self {
            host,
            port,
            api_key,
            allowed_domains,
            cors_origins,
            request_timeout_secs,
            upstream_timeout_secs,
            feed_urls,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = std::env::var(name).unwrap_or_else(|_| default.to_string());
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}

/// Comma-separated list, blanks dropped.
fn list_var(name: &str, default: &str) -> Vec<String> {
    split_list(&std::env::var(name).unwrap_or_else(|_| default.into()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
