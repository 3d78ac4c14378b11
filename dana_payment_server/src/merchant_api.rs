//! Merchant balance lookups, remapped from DANA's resource list into a flat balance snapshot.

use std::fmt::Debug;

use chrono::{DateTime, SecondsFormat, Utc};
use dana_tools::{
    data_objects::{
        QueryMerchantResourceRequest,
        QueryMerchantResourceResponse,
        MERCHANT_AVAILABLE_BALANCE,
        MERCHANT_DEPOSIT_BALANCE,
        MERCHANT_TOTAL_BALANCE,
    },
    DanaApiError,
    DanaEnvironment,
    PaymentProvider,
};
use dpg_common::IDR_CURRENCY_CODE;
use log::*;
use serde_json::Value;
use thiserror::Error;

use crate::data_objects::{BalanceInfo, MerchantInfoData, MerchantInfoMeta, MerchantInfoResponse, MerchantResource};

#[derive(Debug, Clone, Error)]
pub enum MerchantApiError {
    #[error("merchant_id is required")]
    MissingMerchantId,
    #[error(transparent)]
    ProviderError(#[from] DanaApiError),
}

pub struct MerchantApi<P> {
    provider: P,
    default_merchant_id: Option<String>,
    environment: DanaEnvironment,
}

impl<P> Debug for MerchantApi<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MerchantApi ({})", self.environment)
    }
}

impl<P> MerchantApi<P>
where P: PaymentProvider
{
    pub fn new(provider: P, default_merchant_id: Option<String>, environment: DanaEnvironment) -> Self {
        Self { provider, default_merchant_id, environment }
    }

    /// Fetches the balances for `merchant_id`, or for the configured merchant if none is given.
    pub async fn merchant_info(&self, merchant_id: Option<&str>) -> Result<MerchantInfoResponse, MerchantApiError> {
        let merchant_id = merchant_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| self.default_merchant_id.clone())
            .ok_or(MerchantApiError::MissingMerchantId)?;
        debug!("💰️ Fetching merchant resources for {merchant_id}");
        let response =
            self.provider.query_merchant_resource(QueryMerchantResourceRequest::balances(&merchant_id)).await?;
        Ok(map_merchant_resources(&merchant_id, &response, self.environment, Utc::now()))
    }
}

fn resource_description(resource_type: &str) -> &'static str {
    match resource_type {
        MERCHANT_DEPOSIT_BALANCE => "Total deposit balance of the merchant",
        MERCHANT_AVAILABLE_BALANCE => "Available balance that can be used for transactions",
        MERCHANT_TOTAL_BALANCE => "Total balance including all account balances",
        _ => "",
    }
}

/// Reads `{"amount": ..., "currency": ...}` out of a resource value. Numeric amounts are rendered without decimals.
/// Returns `None` if the value is not a JSON object.
fn parse_balance(value: &str) -> Option<BalanceInfo> {
    let json = serde_json::from_str::<Value>(value).ok()?;
    let fields = json.as_object()?;
    let amount = match fields.get("amount") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.as_f64().map(|f| format!("{f:.0}")).unwrap_or_default(),
        _ => String::default(),
    };
    let currency = fields.get("currency").and_then(Value::as_str).unwrap_or(IDR_CURRENCY_CODE).to_string();
    Some(BalanceInfo { amount, currency })
}

pub fn map_merchant_resources(
    merchant_id: &str,
    response: &QueryMerchantResourceResponse,
    environment: DanaEnvironment,
    now: DateTime<Utc>,
) -> MerchantInfoResponse {
    let mut data = MerchantInfoData { merchant_id: merchant_id.to_string(), ..Default::default() };
    let request_id = response.response.head.req_msg_id.clone().filter(|s| !s.is_empty());
    for info in &response.response.body.merchant_resource_informations {
        let resource_type = info.resource_type.as_str();
        if resource_type.is_empty() || info.value.is_empty() {
            trace!("💰️ Skipping empty merchant resource entry");
            continue;
        }
        let value = match parse_balance(&info.value) {
            Some(balance) => {
                let amount = balance.amount.clone();
                match resource_type {
                    MERCHANT_DEPOSIT_BALANCE => data.balances.deposit_balance = Some(balance),
                    MERCHANT_AVAILABLE_BALANCE => data.balances.available_balance = Some(balance),
                    MERCHANT_TOTAL_BALANCE => data.balances.total_balance = Some(balance),
                    other => debug!("💰️ Unrecognised merchant resource type {other}"),
                }
                amount
            },
            None => info.value.clone(),
        };
        data.resources.insert(
            resource_type.to_string(),
            MerchantResource {
                resource_type: resource_type.to_string(),
                value,
                description: resource_description(resource_type).to_string(),
            },
        );
    }
    let message = if data.resources.is_empty() {
        data.resources.insert(
            "note".to_string(),
            MerchantResource {
                resource_type: "info".to_string(),
                value: "No resources available".to_string(),
                description: "The merchant may not have any resource information available at this time".to_string(),
            },
        );
        "No merchant resource information found"
    } else {
        "Merchant information retrieved successfully"
    };
    MerchantInfoResponse {
        success: true,
        message: message.to_string(),
        data: Some(data),
        meta: Some(MerchantInfoMeta {
            request_id,
            timestamp: Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            environment: Some(environment.to_string()),
        }),
    }
}
