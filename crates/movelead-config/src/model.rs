use std::{
    env,
    fmt,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use movelead_domain::CampaignAuth;

use crate::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Deployment environment. Anything other than production exposes failure
/// detail in 500 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "test" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid {
                key: "APP_ENV",
                reason: format!("expected `development` or `production`, got `{other}`"),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Per-address request budget for `/proxy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// Everything the relay needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub credentials: CampaignAuth,
    pub api_url: String,
    /// Answer quotes with a canned body instead of calling the upstream.
    pub use_mock_api: bool,
    /// Relay affiliate (`brands`) data to the client.
    pub use_affiliates: bool,
    /// Value of the upstream `lp_test` flag.
    pub test_mode: bool,
    pub bind_host: IpAddr,
    pub port: u16,
    pub environment: Environment,
    pub rate_limit: RateLimitSettings,
    pub upstream_timeout: Duration,
    pub static_dir: Option<PathBuf>,
}

impl RelayConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests do not have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let campaign_id = required(&lookup, "CAMPAIGN_ID")?;
        let campaign_key = required(&lookup, "CAMPAIGN_KEY")?;
        let api_url = required(&lookup, "API_URL")?;
        let use_mock_api = parse_flag("USE_MOCK_API", &required(&lookup, "USE_MOCK_API")?)?;

        let use_affiliates = optional_flag(&lookup, "USE_AFFILIATES")?.unwrap_or(false);
        let test_mode = optional_flag(&lookup, "UPSTREAM_TEST_MODE")?.unwrap_or(use_mock_api);

        let bind_host = match optional(&lookup, "BIND_HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|err| ConfigError::Invalid {
                key: "BIND_HOST",
                reason: err.to_string(),
            })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = optional_number(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let environment = match optional(&lookup, "APP_ENV") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::default(),
        };

        let max_requests = optional_number(&lookup, "RATE_LIMIT_MAX")?
            .unwrap_or(DEFAULT_RATE_LIMIT_MAX);
        if max_requests == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_MAX",
                reason: "must be at least 1".into(),
            });
        }
        let window_secs = optional_number(&lookup, "RATE_LIMIT_WINDOW_SECS")?
            .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS);
        if window_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_WINDOW_SECS",
                reason: "must be at least 1".into(),
            });
        }
        let timeout_secs = optional_number(&lookup, "UPSTREAM_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        let static_dir = optional(&lookup, "STATIC_DIR").map(PathBuf::from);
        if let Some(dir) = &static_dir {
            if !dir.is_dir() {
                return Err(ConfigError::Invalid {
                    key: "STATIC_DIR",
                    reason: format!("`{}` is not a directory", dir.display()),
                });
            }
        }

        Ok(Self {
            credentials: CampaignAuth {
                campaign_id,
                campaign_key,
            },
            api_url,
            use_mock_api,
            use_affiliates,
            test_mode,
            bind_host,
            port,
            environment,
            rate_limit: RateLimitSettings {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            upstream_timeout: Duration::from_secs(timeout_secs),
            static_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }

    pub fn exposes_error_detail(&self) -> bool {
        self.environment != Environment::Production
    }
}

fn optional<F>(lookup: &F, key: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}

fn optional_flag<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key)
        .map(|raw| parse_flag(key, &raw))
        .transpose()
}

fn optional_number<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    optional(lookup, key)
        .map(|raw| {
            raw.parse::<T>().map_err(|err| ConfigError::Invalid {
                key,
                reason: err.to_string(),
            })
        })
        .transpose()
}
