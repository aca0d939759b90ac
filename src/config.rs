use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub backend: BackendConfig,

    #[command(flatten)]
    pub routes: RouteConfig,

    #[command(flatten)]
    pub cookies: CookieConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "MENUGATE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "MENUGATE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management endpoints (livez/readyz)
    #[arg(long, env = "MENUGATE_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,
}

#[derive(Clone, Debug, Args)]
pub struct BackendConfig {
    /// Base URL of the business-logic backend (Auth and BusinessUser modules)
    #[arg(long, env = "MENUGATE_BACKEND_URL")]
    pub base_url: String,

    /// Timeout for a single backend call in seconds
    #[arg(long, env = "MENUGATE_BACKEND_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// How long a positive membership lookup stays cached, in seconds
    #[arg(long, env = "MENUGATE_AUTHORIZATION_CACHE_TTL_SECS", default_value_t = 30)]
    pub authorization_cache_ttl_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct RouteConfig {
    /// Path prefix of the management panel guarded by the session gate
    #[arg(long, env = "MENUGATE_PROTECTED_PREFIX", default_value = "/panel")]
    pub protected_prefix: String,

    /// Path of the login page
    #[arg(long, env = "MENUGATE_LOGIN_PATH", default_value = "/login")]
    pub login_path: String,
}

#[derive(Clone, Debug, Args)]
pub struct CookieConfig {
    /// Max-age of the accessToken and accessTokenExpire cookies in seconds
    #[arg(long, env = "MENUGATE_ACCESS_COOKIE_MAX_AGE_SECS", default_value_t = 1800)]
    pub access_max_age_secs: i64,

    /// Max-age of the refreshToken and refreshTokenExpire cookies in seconds
    #[arg(long, env = "MENUGATE_REFRESH_COOKIE_MAX_AGE_SECS", default_value_t = 604_800)]
    pub refresh_max_age_secs: i64,

    /// Drop the Secure attribute for local development over plain HTTP
    #[arg(long, env = "MENUGATE_INSECURE_COOKIES", default_value_t = false)]
    pub insecure: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "MENUGATE_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
