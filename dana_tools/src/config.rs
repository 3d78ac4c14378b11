use std::{env, fmt::Display, time::Duration};

use dpg_common::{
    helpers::{env_or_default, optional_env, parse_boolean_flag},
    Secret,
};
use log::*;

use crate::DanaApiError;

pub const PRODUCTION_BASE_URL: &str = "https://api.dana.id";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.dana.id";
pub const DEFAULT_CHANNEL_ID: &str = "95221";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DanaEnvironment {
    Production,
    #[default]
    Sandbox,
    /// Any other `DANA_ENV` value. Talks to the sandbox endpoint but is not treated as the sandbox otherwise.
    Unrecognised,
}

impl DanaEnvironment {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "production" => Self::Production,
            "sandbox" => Self::Sandbox,
            other => {
                warn!("🪛️ Unknown DANA_ENV value '{other}'. Using the sandbox endpoint without sandbox debug features.");
                Self::Unrecognised
            },
        }
    }
}

impl Display for DanaEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
            Self::Unrecognised => f.write_str("unrecognised"),
        }
    }
}

/// Credentials and endpoint settings for talking to the DANA API.
#[derive(Debug, Clone, Default)]
pub struct DanaConfig {
    pub environment: DanaEnvironment,
    /// The host to use instead of the default sandbox host, e.g. "api.sandbox.dana.id". Ignored in production.
    pub host: Option<String>,
    pub scheme: String,
    pub client_id: String,
    /// PEM encoded RSA private key (PKCS#1 or PKCS#8). Literal `\n` sequences are accepted in place of newlines.
    pub private_key: Secret<String>,
    pub client_secret: Secret<String>,
    /// Sent as `X-PARTNER-ID`. Defaults to the client id.
    pub partner_id: String,
    pub channel_id: String,
    pub origin: Option<String>,
    pub user_agent: Option<String>,
    pub debug: bool,
    pub timeout: Duration,
}

impl DanaConfig {
    pub fn new(client_id: &str, private_key: &str, client_secret: &str) -> Self {
        Self {
            scheme: "https".to_string(),
            client_id: client_id.to_string(),
            private_key: Secret::new(private_key.to_string()),
            client_secret: Secret::new(client_secret.to_string()),
            partner_id: client_id.to_string(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            ..Default::default()
        }
    }

    /// Loads the configuration from `DANA_*` environment variables.
    ///
    /// `DANA_CLIENT_ID`, `DANA_PRIVATE_KEY` and `DANA_CLIENT_SECRET` are required.
    pub fn try_from_env() -> Result<Self, DanaApiError> {
        let client_id = required_env("DANA_CLIENT_ID")?;
        let private_key = Secret::new(required_env("DANA_PRIVATE_KEY")?);
        let client_secret = Secret::new(required_env("DANA_CLIENT_SECRET")?);
        let partner_id = optional_env("DANA_X_PARTNER_ID").unwrap_or_else(|| {
            debug!("🪛️ DANA_X_PARTNER_ID is not set. Using the client id as the partner id.");
            client_id.clone()
        });
        let environment = DanaEnvironment::from_name(&env_or_default("DANA_ENV", "sandbox"));
        let debug = parse_boolean_flag(env::var("DANA_DEBUG").ok(), false);
        Ok(Self {
            environment,
            host: optional_env("DANA_HOST"),
            scheme: env_or_default("DANA_SCHEME", "https"),
            client_id,
            private_key,
            client_secret,
            partner_id,
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            origin: optional_env("DANA_ORIGIN"),
            user_agent: optional_env("DANA_USER_AGENT"),
            debug,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn base_url(&self) -> String {
        match (self.environment, &self.host) {
            (DanaEnvironment::Production, _) => PRODUCTION_BASE_URL.to_string(),
            (_, Some(host)) => format!("{}://{host}", self.scheme),
            (_, None) => SANDBOX_BASE_URL.to_string(),
        }
    }

    /// The `X-Debug-Mode` header is only ever sent to the sandbox.
    pub fn debug_mode_header(&self) -> bool {
        self.debug && self.environment == DanaEnvironment::Sandbox
    }
}

fn required_env(name: &str) -> Result<String, DanaApiError> {
    optional_env(name)
        .ok_or_else(|| DanaApiError::Initialization(format!("{name} is required but not set in environment variables")))
}
