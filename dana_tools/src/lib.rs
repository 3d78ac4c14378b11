mod api;
mod config;
mod error;
mod provider;

pub mod data_objects;
pub mod signing;
pub mod timestamp;

pub use api::{DanaApi, CONSULT_PAY_PATH, CREATE_ORDER_PATH, QUERY_MERCHANT_RESOURCE_PATH, QUERY_PAYMENT_PATH};
pub use config::{DanaConfig, DanaEnvironment, DEFAULT_CHANNEL_ID, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use error::DanaApiError;
pub use provider::PaymentProvider;
pub use signing::{RequestSigner, SignatureResult, SigningContext};
