use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::DanaConfig,
    data_objects::{
        ConsultPayRequest,
        CreateOrderRequest,
        CreateOrderResponse,
        QueryMerchantResourceRequest,
        QueryMerchantResourceResponse,
        QueryPaymentRequest,
    },
    signing::{canonicalize, RequestSigner, SignatureResult},
    DanaApiError,
    PaymentProvider,
};

pub const CREATE_ORDER_PATH: &str = "/payment-gateway/v1.0/debit/payment-host-to-host.htm";
pub const QUERY_PAYMENT_PATH: &str = "/payment-gateway/v1.0/debit/status.htm";
pub const CONSULT_PAY_PATH: &str = "/v1.0/payment-gateway/consult-pay.htm";
pub const QUERY_MERCHANT_RESOURCE_PATH: &str = "/v1.0/merchant-management/query-merchant-resource.htm";

/// A signed HTTP client for the DANA API.
///
/// Cloning is cheap: the connection pool and the signer (including the parsed key) are shared between clones.
#[derive(Clone)]
pub struct DanaApi {
    config: DanaConfig,
    client: Arc<Client>,
    signer: Arc<RequestSigner>,
}

impl DanaApi {
    pub fn new(config: DanaConfig) -> Result<Self, DanaApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        if let Some(agent) = &config.user_agent {
            let val = HeaderValue::from_str(agent).map_err(|e| DanaApiError::Initialization(e.to_string()))?;
            headers.insert(USER_AGENT, val);
        }
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DanaApiError::Initialization(e.to_string()))?;
        let signer = RequestSigner::new(config.private_key.clone());
        info!("💻️ DANA client configured for {} ({})", config.base_url(), config.environment);
        Ok(Self { config, client: Arc::new(client), signer: Arc::new(signer) })
    }

    pub fn config(&self) -> &DanaConfig {
        &self.config
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// Serializes `body`, signs it and POSTs it to `path`.
    ///
    /// The bytes that were hashed for the signature are the bytes that go on the wire. A 2xx response is deserialized
    /// into `T`. Any other status becomes [`DanaApiError::Provider`] carrying the response body, pretty-printed when it
    /// is JSON. There is exactly one attempt per call.
    pub async fn signed_post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, DanaApiError> {
        let payload = canonicalize(body)?;
        let signature = self.signer.sign_request("POST", path, &payload)?;
        let url = self.url(path);
        if self.config.debug {
            self.log_request(&url, &signature, &payload);
        } else {
            trace!("💻️ Sending signed request to {url}");
        }
        let mut req = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-TIMESTAMP", signature.timestamp.as_str())
            .header("X-SIGNATURE", signature.signature.as_str())
            .header("X-PARTNER-ID", self.config.partner_id.as_str())
            .header("X-EXTERNAL-ID", signature.external_id.as_str())
            .header("CHANNEL-ID", self.config.channel_id.as_str());
        if let Some(origin) = &self.config.origin {
            req = req.header("ORIGIN", origin.as_str());
        }
        if self.config.debug_mode_header() {
            req = req.header("X-Debug-Mode", "true");
        }
        let response = req.body(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if self.config.debug {
            info!("💻️ DANA responded with {status}: {text}");
        }
        if status.is_success() {
            trace!("💻️ DANA request to {path} succeeded. {status}");
            serde_json::from_str::<T>(&text).map_err(|e| DanaApiError::JsonError(e.to_string()))
        } else {
            warn!("💻️ DANA request to {path} failed. {status}");
            Err(DanaApiError::Provider { status: status.as_u16(), body: pretty_body(text) })
        }
    }

    fn log_request(&self, url: &str, signature: &SignatureResult, payload: &[u8]) {
        let sig = &signature.signature;
        let shown = if sig.len() > 20 { format!("{}...", &sig[..20]) } else { sig.clone() };
        info!(
            "💻️ POST {url}\n  X-TIMESTAMP: {}\n  X-SIGNATURE: {shown}\n  X-PARTNER-ID: {}\n  X-EXTERNAL-ID: {}\n  \
             CHANNEL-ID: {}\n  Body: {}",
            signature.timestamp,
            self.config.partner_id,
            signature.external_id,
            self.config.channel_id,
            String::from_utf8_lossy(payload)
        );
    }
}

fn pretty_body(text: String) -> String {
    serde_json::from_str::<Value>(&text).ok().and_then(|v| serde_json::to_string_pretty(&v).ok()).unwrap_or(text)
}

impl PaymentProvider for DanaApi {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreateOrderResponse, DanaApiError> {
        debug!("💻️ Creating DANA order {}", request.partner_reference_no);
        let response = self.signed_post::<CreateOrderResponse, _>(CREATE_ORDER_PATH, &request).await?;
        info!(
            "💻️ DANA order {} created. {} {}",
            request.partner_reference_no, response.response_code, response.response_message
        );
        Ok(response)
    }

    async fn consult_pay(&self, request: ConsultPayRequest) -> Result<Value, DanaApiError> {
        debug!("💻️ Consulting DANA payment methods for merchant {}", request.merchant_id);
        self.signed_post(CONSULT_PAY_PATH, &request).await
    }

    async fn query_payment(&self, request: QueryPaymentRequest) -> Result<Value, DanaApiError> {
        debug!("💻️ Querying DANA payment status for {}", request.original_partner_reference_no);
        self.signed_post(QUERY_PAYMENT_PATH, &request).await
    }

    async fn query_merchant_resource(
        &self,
        request: QueryMerchantResourceRequest,
    ) -> Result<QueryMerchantResourceResponse, DanaApiError> {
        debug!("💻️ Querying DANA merchant resources for {}", request.request_merchant_id);
        self.signed_post(QUERY_MERCHANT_RESOURCE_PATH, &request).await
    }
}
