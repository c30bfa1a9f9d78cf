use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
const DEFAULT_API_KEY: &str = "DEMO_KEY_123";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a port number, got '{value}'")]
    InvalidPort { key: &'static str, value: String },
    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub env: String,
    pub api_key: String,
    /// Reject requests that omit `X-API-Key` instead of letting them through.
    pub require_api_key: bool,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            require_api_key: false,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(v) = lookup("ENV") {
            settings.env = v;
        }
        if let Some(v) = lookup("INVEST_API_KEY") {
            settings.api_key = v;
        }
        if let Some(v) = lookup("REQUIRE_API_KEY") {
            settings.require_api_key = parse_bool("REQUIRE_API_KEY", &v)?;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            settings.cors_origins = split_origins(&v);
        }
        if let Some(v) = lookup("PORT") {
            settings.port = v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    key: "PORT",
                    value: v.clone(),
                })?;
        }

        Ok(settings)
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
