//! Wire format for DANA API requests and responses.
//!
//! Request structs serialize in declaration order and skip absent optional fields, so the order of the fields below is
//! the order in which they appear in the signed body. Do not reorder them casually.

use dpg_common::Money;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SOURCE_PLATFORM_IPG: &str = "IPG";
pub const TERMINAL_TYPE_WEB: &str = "WEB";
pub const SCENARIO_API: &str = "API";
pub const SCENARIO_REDIRECT: &str = "REDIRECT";
pub const QUERY_PAYMENT_SERVICE_CODE: &str = "54";

pub const MERCHANT_DEPOSIT_BALANCE: &str = "MERCHANT_DEPOSIT_BALANCE";
pub const MERCHANT_AVAILABLE_BALANCE: &str = "MERCHANT_AVAILABLE_BALANCE";
pub const MERCHANT_TOTAL_BALANCE: &str = "MERCHANT_TOTAL_BALANCE";

//--------------------------------------     Create order      -------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOptionDetail {
    pub pay_method: String,
    pub pay_option: String,
    pub trans_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlParam {
    pub url: String,
    #[serde(rename = "type")]
    pub url_type: String,
    pub is_deeplink: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvInfo {
    pub source_platform: String,
    pub terminal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_terminal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_language: Option<String>,
}

impl EnvInfo {
    /// The environment DANA expects for a web checkout.
    pub fn web() -> Self {
        Self {
            source_platform: SOURCE_PLATFORM_IPG.to_string(),
            terminal_type: TERMINAL_TYPE_WEB.to_string(),
            order_terminal_type: Some(TERMINAL_TYPE_WEB.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// The `order` object for a host-to-host (direct selection) checkout. DANA requires a buyer here, even an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrder {
    pub order_title: String,
    pub scenario: String,
    pub merchant_trans_type: String,
    pub buyer: Buyer,
}

/// The `order` object for a hosted (redirect) checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectOrder {
    pub order_title: String,
    pub scenario: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderObject {
    Api(ApiOrder),
    Redirect(RedirectOrder),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAdditionalInfo {
    pub mcc: String,
    pub env_info: EnvInfo,
    pub order: OrderObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub partner_reference_no: String,
    pub merchant_id: String,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_option_details: Option<Vec<PayOptionDetail>>,
    pub url_params: Vec<UrlParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_merchant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_up_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_pay_methods: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<OrderAdditionalInfo>,
}

/// DANA's answer to a create order call. The well-known fields are lifted out; everything else is kept verbatim and
/// serialized back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    #[serde(default)]
    pub response_code: String,
    #[serde(default)]
    pub response_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_reference_no: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//--------------------------------------     Query payment     -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPaymentRequest {
    pub original_partner_reference_no: String,
    pub merchant_id: String,
    pub service_code: String,
}

impl QueryPaymentRequest {
    pub fn new(partner_reference_no: &str, merchant_id: &str) -> Self {
        Self {
            original_partner_reference_no: partner_reference_no.to_string(),
            merchant_id: merchant_id.to_string(),
            service_code: QUERY_PAYMENT_SERVICE_CODE.to_string(),
        }
    }
}

//--------------------------------------      Consult pay      -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultPayAdditionalInfo {
    pub buyer: Buyer,
    pub env_info: EnvInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultPayRequest {
    pub merchant_id: String,
    pub amount: Money,
    pub additional_info: ConsultPayAdditionalInfo,
}

//--------------------------------------   Merchant resources  -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMerchantResourceRequest {
    pub request_merchant_id: String,
    pub merchant_resource_info_list: Vec<String>,
}

impl QueryMerchantResourceRequest {
    /// Asks for every balance DANA keeps for the merchant.
    pub fn balances(merchant_id: &str) -> Self {
        Self {
            request_merchant_id: merchant_id.to_string(),
            merchant_resource_info_list: [MERCHANT_DEPOSIT_BALANCE, MERCHANT_AVAILABLE_BALANCE, MERCHANT_TOTAL_BALANCE]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMerchantResourceResponse {
    #[serde(default)]
    pub response: MerchantResourceEnvelope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantResourceEnvelope {
    #[serde(default)]
    pub head: ResponseHead,
    #[serde(default)]
    pub body: MerchantResourceBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHead {
    #[serde(default)]
    pub req_msg_id: Option<String>,
    #[serde(default)]
    pub resp_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantResourceBody {
    #[serde(default)]
    pub merchant_resource_informations: Vec<MerchantResourceInformation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantResourceInformation {
    #[serde(default)]
    pub resource_type: String,
    /// A JSON document such as `{"amount":"1000.00","currency":"IDR"}`, encoded as a string.
    #[serde(default)]
    pub value: String,
}
