use std::env;

use dana_tools::{data_objects::Buyer, DanaConfig};
use dpg_common::helpers::{env_or_default, optional_env};
use log::*;

use crate::errors::ServerError;

const DEFAULT_DPG_HOST: &str = "0.0.0.0";
const DEFAULT_DPG_PORT: u16 = 3150;
pub const DEFAULT_MCC: &str = "5999";
pub const DEFAULT_MERCHANT_TRANS_TYPE: &str = "SALE";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Credentials and endpoint for the DANA API
    pub dana: DanaConfig,
    /// Defaults that are filled into every outgoing order
    pub checkout: CheckoutConfig,
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, dana: DanaConfig) -> Self {
        Self { host: host.to_string(), port, dana, checkout: CheckoutConfig::default() }
    }

    /// Reads the server configuration from the environment.
    ///
    /// The DANA credentials are mandatory, and their absence is an error. Everything else falls back to a default,
    /// with a log message if the supplied value could not be used.
    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("HOST").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| DEFAULT_DPG_HOST.into());
        let port = env::var("PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for PORT. {e} Using the default, {DEFAULT_DPG_PORT}, instead.");
                    DEFAULT_DPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DPG_PORT);
        let dana = DanaConfig::try_from_env().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
        let checkout = CheckoutConfig::from_env();
        Ok(Self { host, port, dana, checkout })
    }
}

/// Order defaults read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Used when a request does not name a merchant.
    pub merchant_id: Option<String>,
    pub mcc: String,
    /// When absent, orders are titled `Order {partner_reference_no}`.
    pub order_title: Option<String>,
    pub merchant_trans_type: String,
    pub buyer: Buyer,
    pub client_ip: Option<String>,
    pub session_id: Option<String>,
    pub token_id: Option<String>,
    pub os_type: Option<String>,
    pub website_language: Option<String>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            merchant_id: None,
            mcc: DEFAULT_MCC.to_string(),
            order_title: None,
            merchant_trans_type: DEFAULT_MERCHANT_TRANS_TYPE.to_string(),
            buyer: Buyer::default(),
            client_ip: None,
            session_id: None,
            token_id: None,
            os_type: None,
            website_language: None,
        }
    }
}

impl CheckoutConfig {
    pub fn from_env() -> Self {
        let merchant_id = optional_env("DANA_MERCHANT_ID");
        if merchant_id.is_none() {
            warn!(
                "🪛️ DANA_MERCHANT_ID is not set. Every order and merchant info request will have to supply its own \
                 merchant id."
            );
        }
        let buyer = Buyer {
            external_user_type: optional_env("DANA_BUYER_EXTERNAL_USER_TYPE"),
            nickname: optional_env("DANA_BUYER_NICKNAME"),
            external_user_id: optional_env("DANA_BUYER_EXTERNAL_USER_ID"),
            user_id: optional_env("DANA_BUYER_USER_ID"),
        };
        Self {
            merchant_id,
            mcc: env_or_default("DANA_MCC", DEFAULT_MCC),
            order_title: optional_env("DANA_ORDER_TITLE"),
            merchant_trans_type: env_or_default("DANA_MERCHANT_TRANS_TYPE", DEFAULT_MERCHANT_TRANS_TYPE),
            buyer,
            client_ip: optional_env("DANA_CLIENT_IP"),
            session_id: optional_env("DANA_SESSION_ID"),
            token_id: optional_env("DANA_TOKEN_ID"),
            os_type: optional_env("DANA_OS_TYPE"),
            website_language: optional_env("DANA_WEBSITE_LANGUAGE"),
        }
    }

    /// The merchant id to use for a request: the explicit one if it is non-empty, otherwise the configured default.
    pub fn resolve_merchant_id(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| self.merchant_id.clone())
    }

    pub fn order_title_for(&self, partner_reference_no: &str) -> String {
        self.order_title.clone().unwrap_or_else(|| format!("Order {partner_reference_no}"))
    }
}
