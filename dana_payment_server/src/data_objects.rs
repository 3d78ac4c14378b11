use std::{collections::BTreeMap, fmt::Display};

use dpg_common::Money;
use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------     Inbound orders     ------------------------------------------------------
/// The body of `POST /api/v1/order` and `POST /api/v1/order/custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub partner_reference_no: String,
    #[serde(default)]
    pub merchant_id: Option<String>,
    pub amount: Money,
    /// Present and non-empty for a direct selection (host-to-host) checkout. Absent, `null` or empty for a hosted
    /// checkout.
    #[serde(default)]
    pub pay_option_details: Option<Vec<PayOptionDetailRequest>>,
    pub url_params: Vec<UrlParamRequest>,
    #[serde(default)]
    pub sub_merchant_id: Option<String>,
    #[serde(default)]
    pub external_store_id: Option<String>,
    /// Expiry in `YYYY-MM-DDTHH:mm:ss+07:00` form. Defaults to an hour from now.
    #[serde(default)]
    pub valid_up_to: Option<String>,
    #[serde(default)]
    pub disabled_pay_methods: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayOptionDetailRequest {
    pub pay_method: String,
    pub pay_option: String,
    pub trans_amount: Money,
    #[serde(default)]
    pub fee_amount: Option<Money>,
    #[serde(default)]
    pub card_token: Option<String>,
    #[serde(default)]
    pub merchant_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlParamRequest {
    pub url: String,
    /// `PAY_RETURN` or `NOTIFICATION`
    #[serde(rename = "type")]
    pub url_type: String,
    /// "true"/"false" or "Y"/"N"
    pub is_deeplink: String,
}

impl CreateOrderRequest {
    pub fn pay_options(&self) -> &[PayOptionDetailRequest] {
        self.pay_option_details.as_deref().unwrap_or_default()
    }

    pub fn has_pay_options(&self) -> bool {
        !self.pay_options().is_empty()
    }
}

//--------------------------------------       Responses        ------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> JsonResponse<T> {
    pub fn success<S: Display>(message: S, data: T) -> Self {
        Self { success: true, message: message.to_string(), data }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    pub details: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

//--------------------------------------     Merchant info      ------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantInfoResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<MerchantInfoData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MerchantInfoMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantInfoData {
    pub merchant_id: String,
    pub balances: MerchantBalances,
    pub resources: BTreeMap<String, MerchantResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantBalances {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_balance: Option<BalanceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_balance: Option<BalanceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_balance: Option<BalanceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceInfo {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantInfoMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}
