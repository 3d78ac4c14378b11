use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use dana_tools::{
    data_objects::{MerchantResourceInformation, QueryMerchantResourceResponse, MERCHANT_AVAILABLE_BALANCE},
    DanaApiError,
    DanaEnvironment,
};
use serde_json::json;

use super::{
    helpers::{configure_merchant, get_request, send, DEFAULT_MERCHANT},
    mocks::MockProvider,
};
use crate::{config::CheckoutConfig, merchant_api::MerchantApi, order_flow_api::OrderFlowApi};

fn balances() -> QueryMerchantResourceResponse {
    let mut response = QueryMerchantResourceResponse::default();
    response.response.head.req_msg_id = Some("a1b2c3".to_string());
    response.response.body.merchant_resource_informations = vec![MerchantResourceInformation {
        resource_type: MERCHANT_AVAILABLE_BALANCE.to_string(),
        value: r#"{"amount":"125000.00","currency":"IDR"}"#.to_string(),
    }];
    response
}

#[actix_web::test]
async fn merchant_info_for_the_configured_merchant() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_query_merchant_resource()
        .withf(|req| req.request_merchant_id == DEFAULT_MERCHANT && req.merchant_resource_info_list.len() == 3)
        .times(1)
        .returning(|_| Ok(balances()));
    let (status, body) = get_request("/api/v1/merchant/info", |cfg| configure_merchant(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["merchant_id"], DEFAULT_MERCHANT);
    assert_eq!(body["data"]["balances"], json!({"available_balance": {"amount": "125000.00", "currency": "IDR"}}));
    assert_eq!(
        body["data"]["resources"][MERCHANT_AVAILABLE_BALANCE],
        json!({
            "type": MERCHANT_AVAILABLE_BALANCE,
            "value": "125000.00",
            "description": "Available balance that can be used for transactions"
        })
    );
    assert_eq!(body["meta"]["request_id"], "a1b2c3");
    assert_eq!(body["meta"]["environment"], "sandbox");
}

#[actix_web::test]
async fn merchant_info_for_an_explicit_merchant() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_query_merchant_resource()
        .withf(|req| req.request_merchant_id == "other-merchant")
        .times(1)
        .returning(|_| Ok(QueryMerchantResourceResponse::default()));
    let (status, body) =
        get_request("/api/v1/merchant/info/other-merchant", |cfg| configure_merchant(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No merchant resource information found");
    assert_eq!(body["data"]["merchant_id"], "other-merchant");
    assert_eq!(body["data"]["resources"]["note"]["type"], "info");
}

fn configure_without_default_merchant(cfg: &mut ServiceConfig, provider: MockProvider) {
    cfg.app_data(web::Data::new(MerchantApi::new(provider, None, DanaEnvironment::Sandbox)))
        .app_data(web::Data::new(OrderFlowApi::new(MockProvider::new(), CheckoutConfig::default())));
}

#[actix_web::test]
async fn merchant_id_is_required() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_query_merchant_resource().never();
    let (status, body) = send::<MockProvider, _>(TestRequest::get().uri("/api/v1/merchant/info"), |cfg| {
        configure_without_default_merchant(cfg, provider)
    })
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "merchant_id is required");
    assert_eq!(
        body["details"],
        "Merchant ID must be provided either as path parameter or in environment variable DANA_MERCHANT_ID"
    );
}

#[actix_web::test]
async fn unreachable_provider_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_query_merchant_resource()
        .times(1)
        .returning(|_| Err(DanaApiError::Network("connection refused".into())));
    let (status, body) = get_request("/api/v1/merchant/info", |cfg| configure_merchant(cfg, provider)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "NETWORK_ERROR");
    assert_eq!(body["error"], "Request to DANA failed: connection refused");
}
