use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::{header::ContentType, StatusCode},
    web::JsonConfig,
    HttpRequest,
    HttpResponse,
};
use dana_tools::DanaApiError;
use log::*;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{data_objects::ErrorResponse, merchant_api::MerchantApiError, order_flow_api::OrderFlowError};

const INVALID_REQUEST_BODY: &str = "Invalid request body";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{message}")]
    ValidationError { message: String, details: String },
    #[error("{0}")]
    DanaError(#[from] DanaApiError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    /// The machine readable error code sent in the `code` field of error responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequestBody(_) | Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::DanaError(e) => e.code(),
            Self::InitializeError(_) | Self::ConfigurationError(_) | Self::IOError(_) | Self::Unspecified(_) => {
                "INTERNAL_ERROR"
            },
        }
    }

    pub fn validation<M: Into<String>, D: Into<String>>(message: M, details: D) -> Self {
        Self::ValidationError { message: message.into(), details: details.into() }
    }

    /// The `details` field of error responses. Provider rejections carry DANA's status and body, everything else a
    /// human readable hint.
    pub fn details(&self) -> Value {
        match self {
            Self::InvalidRequestBody(_) => json!(INVALID_REQUEST_BODY),
            Self::ValidationError { details, .. } => json!(details),
            Self::DanaError(e) => match e {
                DanaApiError::Provider { status, body } => json!({ "status": status, "body": body }),
                DanaApiError::Network(_) => json!("Could not reach the DANA API"),
                DanaApiError::Timeout(_) => json!("The DANA API did not respond in time"),
                DanaApiError::JsonError(_) => json!("The DANA API returned an unexpected response"),
                DanaApiError::KeyFormat(_) => json!("The configured DANA private key could not be loaded"),
                DanaApiError::Signing(_) => json!("The request to DANA could not be signed"),
                DanaApiError::Serialization(_) => json!("The request to DANA could not be encoded"),
                DanaApiError::Initialization(_) => json!("The DANA client could not be initialized"),
            },
            Self::InitializeError(_) | Self::ConfigurationError(_) | Self::IOError(_) | Self::Unspecified(_) => {
                json!("Internal server error")
            },
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::DanaError(e) => match e {
                DanaApiError::Provider { .. } => StatusCode::BAD_GATEWAY,
                DanaApiError::Network(_) => StatusCode::BAD_GATEWAY,
                DanaApiError::JsonError(_) => StatusCode::BAD_GATEWAY,
                DanaApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                DanaApiError::KeyFormat(_) => StatusCode::INTERNAL_SERVER_ERROR,
                DanaApiError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
                DanaApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
                DanaApiError::Initialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code().to_string(),
            details: self.details(),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::to_string(&body).unwrap_or_else(|_| json!({ "success": false }).to_string()))
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::ValidationError(s) => Self::validation(s, INVALID_REQUEST_BODY),
            OrderFlowError::MissingPayOptions => Self::validation(
                e.to_string(),
                "Custom checkout requires pay_option_details to specify payment method",
            ),
            OrderFlowError::MissingReference => {
                Self::validation(e.to_string(), "Partner reference number must be provided as path parameter")
            },
            OrderFlowError::ProviderError(e) => Self::DanaError(e),
        }
    }
}

impl From<MerchantApiError> for ServerError {
    fn from(e: MerchantApiError) -> Self {
        match e {
            MerchantApiError::MissingMerchantId => Self::validation(
                e.to_string(),
                "Merchant ID must be provided either as path parameter or in environment variable DANA_MERCHANT_ID",
            ),
            MerchantApiError::ProviderError(e) => Self::DanaError(e),
        }
    }
}

/// Malformed or incomplete JSON bodies are reported in the same envelope as every other error.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
