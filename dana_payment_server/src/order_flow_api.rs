//! Turns inbound order requests into signed DANA calls.
//!
//! There are two checkout flavours. A *direct selection* checkout (`scenario = "API"`) names the payment method up
//! front in `payOptionDetails`. A *hosted* checkout (`scenario = "REDIRECT"`) sends the buyer to DANA's cashier page to
//! choose. Both share validation, callback URL normalization and the order expiry default. Every check happens before
//! the provider is called, so an invalid request never reaches the signer.

use std::fmt::Debug;

use chrono::Utc;
use dana_tools::{
    data_objects::{
        ApiOrder,
        Buyer,
        ConsultPayAdditionalInfo,
        ConsultPayRequest,
        CreateOrderRequest as DanaOrderRequest,
        CreateOrderResponse,
        EnvInfo,
        OrderAdditionalInfo,
        OrderObject,
        PayOptionDetail,
        QueryPaymentRequest,
        RedirectOrder,
        UrlParam,
        SCENARIO_API,
        SCENARIO_REDIRECT,
    },
    timestamp::default_expiry,
    DanaApiError,
    PaymentProvider,
};
use dpg_common::{parse_minor_units, Money, IDR_CURRENCY_CODE};
use log::*;
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::CheckoutConfig,
    data_objects::{CreateOrderRequest, PayOptionDetailRequest, UrlParamRequest},
};

/// The amount used to ask DANA which payment methods are on offer.
pub const PAYMENT_METHOD_SAMPLE_AMOUNT: &str = "100000";

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("{0}")]
    ValidationError(String),
    #[error("pay_option_details is required for custom checkout")]
    MissingPayOptions,
    #[error("partner_reference_no is required")]
    MissingReference,
    #[error(transparent)]
    ProviderError(#[from] DanaApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutKind {
    /// Host-to-host. The caller chose the payment method.
    Direct,
    /// Redirect to DANA's hosted checkout page.
    Hosted,
}

/// `OrderFlowApi` builds DANA order payloads from inbound requests and hands them to the payment provider.
pub struct OrderFlowApi<P> {
    provider: P,
    checkout: CheckoutConfig,
}

impl<P> Debug for OrderFlowApi<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<P> OrderFlowApi<P> {
    pub fn new(provider: P, checkout: CheckoutConfig) -> Self {
        Self { provider, checkout }
    }

    pub fn checkout_config(&self) -> &CheckoutConfig {
        &self.checkout
    }

    /// Builds the host-to-host order payload. `pay_option_details` must be non-empty.
    pub fn build_direct_order(&self, req: &CreateOrderRequest) -> Result<DanaOrderRequest, OrderFlowError> {
        let merchant_id = self.validate_common(req)?;
        if !req.has_pay_options() {
            return Err(OrderFlowError::MissingPayOptions);
        }
        if req.url_params.is_empty() {
            return Err(url_params_required());
        }
        validate_pay_options(req.pay_options())?;
        let amount = req.amount.formatted();
        let pay_option_details = req.pay_options().iter().map(pay_option_detail).collect::<Vec<_>>();
        check_trans_amount_sum(&amount, &pay_option_details);
        let url_params = normalize_url_params(&req.url_params)?;
        let order = OrderObject::Api(ApiOrder {
            order_title: self.checkout.order_title_for(&req.partner_reference_no),
            scenario: SCENARIO_API.to_string(),
            merchant_trans_type: self.checkout.merchant_trans_type.clone(),
            buyer: self.checkout.buyer.clone(),
        });
        let env_info = EnvInfo {
            client_ip: self.checkout.client_ip.clone(),
            session_id: self.checkout.session_id.clone(),
            token_id: self.checkout.token_id.clone(),
            os_type: self.checkout.os_type.clone(),
            website_language: self.checkout.website_language.clone(),
            ..EnvInfo::web()
        };
        Ok(self.assemble(req, merchant_id, amount, Some(pay_option_details), url_params, env_info, order))
    }

    /// Builds the hosted (redirect) order payload. Any `pay_option_details` in the request are ignored.
    pub fn build_hosted_order(&self, req: &CreateOrderRequest) -> Result<DanaOrderRequest, OrderFlowError> {
        let merchant_id = self.validate_common(req)?;
        if req.url_params.is_empty() {
            return Err(url_params_required());
        }
        let amount = req.amount.formatted();
        let url_params = normalize_url_params(&req.url_params)?;
        let order = OrderObject::Redirect(RedirectOrder {
            order_title: self.checkout.order_title_for(&req.partner_reference_no),
            scenario: SCENARIO_REDIRECT.to_string(),
        });
        Ok(self.assemble(req, merchant_id, amount, None, url_params, EnvInfo::web(), order))
    }

    fn validate_common(&self, req: &CreateOrderRequest) -> Result<String, OrderFlowError> {
        if req.partner_reference_no.trim().is_empty() {
            return Err(OrderFlowError::ValidationError("partner_reference_no is required".to_string()));
        }
        validate_money(&req.amount, "amount")?;
        self.checkout.resolve_merchant_id(req.merchant_id.as_deref()).ok_or_else(|| {
            OrderFlowError::ValidationError(
                "merchant_id is required. Supply it in the request or set DANA_MERCHANT_ID".to_string(),
            )
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        req: &CreateOrderRequest,
        merchant_id: String,
        amount: Money,
        pay_option_details: Option<Vec<PayOptionDetail>>,
        url_params: Vec<UrlParam>,
        env_info: EnvInfo,
        order: OrderObject,
    ) -> DanaOrderRequest {
        DanaOrderRequest {
            partner_reference_no: req.partner_reference_no.clone(),
            merchant_id,
            amount,
            pay_option_details,
            url_params,
            sub_merchant_id: req.sub_merchant_id.clone(),
            external_store_id: req.external_store_id.clone(),
            valid_up_to: Some(valid_up_to(req.valid_up_to.as_deref())),
            disabled_pay_methods: req.disabled_pay_methods.clone(),
            additional_info: Some(OrderAdditionalInfo { mcc: self.checkout.mcc.clone(), env_info, order }),
        }
    }
}

impl<P> OrderFlowApi<P>
where P: PaymentProvider
{
    /// Creates an order, choosing the checkout flavour from the request: direct selection when `pay_option_details`
    /// is non-empty, hosted otherwise.
    pub async fn create_order(
        &self,
        req: CreateOrderRequest,
    ) -> Result<(CheckoutKind, CreateOrderResponse), OrderFlowError> {
        if !req.has_pay_options() {
            let response = self.create_hosted_order(req).await?;
            Ok((CheckoutKind::Hosted, response))
        } else {
            let response = self.create_direct_order(req).await?;
            Ok((CheckoutKind::Direct, response))
        }
    }

    pub async fn create_direct_order(&self, req: CreateOrderRequest) -> Result<CreateOrderResponse, OrderFlowError> {
        let order = self.build_direct_order(&req)?;
        debug!("🔄️📦️ Submitting direct selection order [{}]", order.partner_reference_no);
        let response = self.provider.create_order(order).await?;
        info!("🔄️📦️ Direct selection order [{}] created. {}", req.partner_reference_no, response.response_code);
        Ok(response)
    }

    pub async fn create_hosted_order(&self, req: CreateOrderRequest) -> Result<CreateOrderResponse, OrderFlowError> {
        let order = self.build_hosted_order(&req)?;
        debug!("🔄️📦️ Submitting hosted checkout order [{}]", order.partner_reference_no);
        let response = self.provider.create_order(order).await?;
        info!("🔄️📦️ Hosted checkout order [{}] created. {}", req.partner_reference_no, response.response_code);
        Ok(response)
    }

    /// Asks DANA which payment methods are available for a sample IDR amount.
    pub async fn payment_methods(&self) -> Result<Value, OrderFlowError> {
        let merchant_id = self.checkout.merchant_id.clone().unwrap_or_else(|| {
            warn!("🔄️💳️ No default merchant id is configured. Consulting payment methods without one.");
            String::default()
        });
        let request = ConsultPayRequest {
            merchant_id,
            amount: Money::idr(PAYMENT_METHOD_SAMPLE_AMOUNT).formatted(),
            additional_info: ConsultPayAdditionalInfo { buyer: Buyer::default(), env_info: EnvInfo::web() },
        };
        let methods = self.provider.consult_pay(request).await?;
        trace!("🔄️💳️ Payment methods: {methods}");
        Ok(methods)
    }

    /// Fetches the payment status of the order with the given partner reference number.
    pub async fn fetch_order(&self, partner_reference_no: &str) -> Result<Value, OrderFlowError> {
        let partner_reference_no = partner_reference_no.trim();
        if partner_reference_no.is_empty() {
            return Err(OrderFlowError::MissingReference);
        }
        let merchant_id = self.checkout.merchant_id.clone().unwrap_or_default();
        let request = QueryPaymentRequest::new(partner_reference_no, &merchant_id);
        let order = self.provider.query_payment(request).await?;
        debug!("🔄️📦️ Fetched order [{partner_reference_no}]");
        Ok(order)
    }
}

fn url_params_required() -> OrderFlowError {
    OrderFlowError::ValidationError("url_params is required and cannot be empty".to_string())
}

fn required(value: &str, field: &str) -> Result<(), OrderFlowError> {
    if value.trim().is_empty() {
        return Err(OrderFlowError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

fn validate_money(money: &Money, field: &str) -> Result<(), OrderFlowError> {
    required(&money.value, &format!("{field}.value"))?;
    required(&money.currency, &format!("{field}.currency"))
}

/// Every pay option needs a method, an option and a complete transaction amount. A fee, when given, must be complete.
fn validate_pay_options(options: &[PayOptionDetailRequest]) -> Result<(), OrderFlowError> {
    options.iter().enumerate().try_for_each(|(i, option)| {
        required(&option.pay_method, &format!("pay_option_details[{i}].pay_method"))?;
        required(&option.pay_option, &format!("pay_option_details[{i}].pay_option"))?;
        validate_money(&option.trans_amount, &format!("pay_option_details[{i}].trans_amount"))?;
        match &option.fee_amount {
            Some(fee) => validate_money(fee, &format!("pay_option_details[{i}].fee_amount")),
            None => Ok(()),
        }
    })
}

fn pay_option_detail(req: &PayOptionDetailRequest) -> PayOptionDetail {
    PayOptionDetail {
        pay_method: req.pay_method.clone(),
        pay_option: req.pay_option.clone(),
        trans_amount: req.trans_amount.formatted(),
        fee_amount: req.fee_amount.as_ref().map(Money::formatted),
        card_token: req.card_token.clone(),
        merchant_token: req.merchant_token.clone(),
    }
}

/// Maps the free-form `is_deeplink` value onto DANA's `Y`/`N`. Notification callbacks are always `N`.
pub fn normalize_deeplink(is_deeplink: &str, url_type: &str) -> &'static str {
    if url_type.trim().eq_ignore_ascii_case("NOTIFICATION") {
        return "N";
    }
    match is_deeplink.trim().to_uppercase().as_str() {
        "TRUE" | "Y" => "Y",
        _ => "N",
    }
}

/// Normalizes every callback. A URL that is not http(s) fails the whole request.
pub fn normalize_url_params(params: &[UrlParamRequest]) -> Result<Vec<UrlParam>, OrderFlowError> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            required(&p.url, &format!("url_params[{i}].url"))?;
            required(&p.url_type, &format!("url_params[{i}].type"))?;
            required(&p.is_deeplink, &format!("url_params[{i}].is_deeplink"))?;
            let url = p.url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(OrderFlowError::ValidationError(format!(
                    "invalid URL format for url_params[{i}]: must start with http:// or https://"
                )));
            }
            Ok(UrlParam {
                url: url.to_string(),
                url_type: p.url_type.clone(),
                is_deeplink: normalize_deeplink(&p.is_deeplink, &p.url_type).to_string(),
            })
        })
        .collect()
}

/// A caller supplied expiry is passed through untouched. Otherwise orders expire an hour from now.
pub fn valid_up_to(requested: Option<&str>) -> String {
    match requested {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default_expiry(Utc::now()),
    }
}

/// Logs a warning if the IDR pay option amounts do not add up to the order total. The order is submitted either way.
pub fn check_trans_amount_sum(amount: &Money, details: &[PayOptionDetail]) -> bool {
    if amount.currency != IDR_CURRENCY_CODE {
        return true;
    }
    let Ok(total) = parse_minor_units(&amount.value) else {
        return true;
    };
    let sum = details
        .iter()
        .filter(|d| d.trans_amount.currency == IDR_CURRENCY_CODE)
        .filter_map(|d| parse_minor_units(&d.trans_amount.value).ok())
        .try_fold(0i64, |acc, v| acc.checked_add(v));
    let Some(sum) = sum else {
        warn!(
            "🔄️📦️ The pay option amounts are too large to add up, so they cannot match the order total of {:.2} IDR. \
             Submitting anyway.",
            total as f64 / 100.0
        );
        return false;
    };
    if sum > 0 && sum != total {
        warn!(
            "🔄️📦️ The pay option amounts add up to {:.2} IDR, but the order total is {:.2} IDR. Submitting anyway.",
            sum as f64 / 100.0,
            total as f64 / 100.0
        );
        return false;
    }
    true
}
