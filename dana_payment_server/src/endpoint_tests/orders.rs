use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use dana_tools::{
    data_objects::{CreateOrderRequest, OrderObject},
    signing::canonicalize,
    DanaApiError,
};
use serde_json::json;

use super::{
    helpers::{configure_orders, get_request, order_created, post_request, DEFAULT_MERCHANT},
    mocks::MockProvider,
};

const HOSTED_ORDER: &str = r#"{
    "partner_reference_no": "ref-1",
    "amount": {"value": "50000", "currency": "IDR"},
    "url_params": [{"url": "https://shop.example.com/notify", "type": "NOTIFICATION", "is_deeplink": "true"}]
}"#;

const DIRECT_ORDER: &str = r#"{
    "partner_reference_no": "ref-2",
    "merchant_id": "m-explicit",
    "amount": {"value": "75000.5", "currency": "IDR"},
    "pay_option_details": [{
        "pay_method": "VIRTUAL_ACCOUNT",
        "pay_option": "VIRTUAL_ACCOUNT_BCA",
        "trans_amount": {"value": "75000.5", "currency": "IDR"},
        "fee_amount": {"value": "2500", "currency": "IDR"}
    }],
    "url_params": [
        {"url": " https://shop.example.com/return ", "type": "PAY_RETURN", "is_deeplink": "y"},
        {"url": "https://shop.example.com/notify", "type": "notification", "is_deeplink": "Y"}
    ],
    "valid_up_to": "2030-01-01T10:00:00+07:00",
    "disabled_pay_methods": "CREDIT_CARD"
}"#;

fn capturing_provider() -> (MockProvider, Arc<Mutex<Option<CreateOrderRequest>>>) {
    let captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();
    let mut provider = MockProvider::new();
    provider.expect_create_order().times(1).returning(move |req| {
        *sink.lock().unwrap() = Some(req);
        Ok(order_created())
    });
    (provider, captured)
}

#[actix_web::test]
async fn order_without_pay_options_uses_hosted_checkout() {
    let _ = env_logger::try_init().ok();
    let (provider, captured) = capturing_provider();
    let (status, body) = post_request("/api/v1/order", HOSTED_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["responseCode"], "2005400");
    assert_eq!(body["data"]["webRedirectUrl"], "https://m.sandbox.dana.id/m/portal/cashier/checkout?bizNo=1");

    let order = captured.lock().unwrap().take().unwrap();
    assert_eq!(order.merchant_id, DEFAULT_MERCHANT);
    assert!(order.pay_option_details.is_none());
    let info = order.additional_info.clone().unwrap();
    assert!(matches!(info.order, OrderObject::Redirect(ref o) if o.scenario == "REDIRECT"));
    assert!(order.valid_up_to.as_deref().unwrap().ends_with("+07:00"));

    let wire = String::from_utf8(canonicalize(&order_without_expiry(order)).unwrap()).unwrap();
    assert!(wire.contains(r#""amount":{"value":"50000.00","currency":"IDR"}"#), "{wire}");
    assert!(wire.contains(r#""isDeeplink":"N""#), "{wire}");
    assert!(!wire.contains("null"));
}

fn order_without_expiry(mut order: CreateOrderRequest) -> CreateOrderRequest {
    order.valid_up_to = None;
    order
}

#[actix_web::test]
async fn order_with_pay_options_uses_direct_selection() {
    let _ = env_logger::try_init().ok();
    let (provider, captured) = capturing_provider();
    let (status, body) = post_request("/api/v1/order", DIRECT_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order created successfully (Custom Checkout)");

    let order = captured.lock().unwrap().take().unwrap();
    assert_eq!(order.merchant_id, "m-explicit");
    assert_eq!(order.valid_up_to.as_deref(), Some("2030-01-01T10:00:00+07:00"));
    let wire = serde_json::to_value(&order).unwrap();
    assert_eq!(wire["amount"], json!({"value": "75000.50", "currency": "IDR"}));
    assert_eq!(
        wire["payOptionDetails"],
        json!([{
            "payMethod": "VIRTUAL_ACCOUNT",
            "payOption": "VIRTUAL_ACCOUNT_BCA",
            "transAmount": {"value": "75000.50", "currency": "IDR"},
            "feeAmount": {"value": "2500.00", "currency": "IDR"}
        }])
    );
    assert_eq!(
        wire["urlParams"],
        json!([
            {"url": "https://shop.example.com/return", "type": "PAY_RETURN", "isDeeplink": "Y"},
            {"url": "https://shop.example.com/notify", "type": "notification", "isDeeplink": "N"}
        ])
    );
    assert_eq!(wire["disabledPayMethods"], "CREDIT_CARD");
    assert_eq!(
        wire["additionalInfo"]["order"],
        json!({"orderTitle": "Order ref-2", "scenario": "API", "merchantTransType": "SALE", "buyer": {}})
    );
}

#[actix_web::test]
async fn custom_order_requires_pay_options() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_create_order().never();
    let (status, body) =
        post_request("/api/v1/order/custom", HOSTED_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "pay_option_details is required for custom checkout",
            "code": "VALIDATION_ERROR",
            "details": "Custom checkout requires pay_option_details to specify payment method"
        })
    );
}

#[actix_web::test]
async fn null_pay_options_use_hosted_checkout() {
    let _ = env_logger::try_init().ok();
    let (provider, captured) = capturing_provider();
    let body = HOSTED_ORDER.replace(r#""url_params""#, r#""pay_option_details": null, "url_params""#);
    let (status, body) = post_request("/api/v1/order", &body, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Order created successfully");
    let order = captured.lock().unwrap().take().unwrap();
    assert!(order.pay_option_details.is_none());
    assert!(matches!(order.additional_info.unwrap().order, OrderObject::Redirect(_)));
}

#[actix_web::test]
async fn empty_required_fields_never_reach_the_provider() {
    let _ = env_logger::try_init().ok();
    let cases = [
        (HOSTED_ORDER.replace(r#""value": "50000""#, r#""value": """#), "amount.value is required"),
        (HOSTED_ORDER.replace(r#""currency": "IDR""#, r#""currency": """#), "amount.currency is required"),
        (HOSTED_ORDER.replace(r#""type": "NOTIFICATION""#, r#""type": """#), "url_params[0].type is required"),
        (
            DIRECT_ORDER.replace(r#""pay_option": "VIRTUAL_ACCOUNT_BCA""#, r#""pay_option": """#),
            "pay_option_details[0].pay_option is required",
        ),
    ];
    for (order, message) in cases {
        let mut provider = MockProvider::new();
        provider.expect_create_order().never();
        let (status, body) = post_request("/api/v1/order", &order, |cfg| configure_orders(cfg, provider)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"], message);
        assert_eq!(body["details"], "Invalid request body");
    }
}

#[actix_web::test]
async fn custom_order_with_pay_options() {
    let _ = env_logger::try_init().ok();
    let (provider, captured) = capturing_provider();
    let (status, body) = post_request("/api/v1/order/custom", DIRECT_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order created successfully (Custom Checkout)");
    let order = captured.lock().unwrap().take().unwrap();
    assert!(matches!(order.additional_info.unwrap().order, OrderObject::Api(_)));
}

#[actix_web::test]
async fn invalid_callback_url_never_reaches_the_provider() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_create_order().never();
    let body = HOSTED_ORDER.replace("https://shop.example.com/notify", "shop.example.com/notify");
    let (status, body) = post_request("/api/v1/order", &body, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "invalid URL format for url_params[0]: must start with http:// or https://");
    assert_eq!(body["details"], "Invalid request body");
}

#[actix_web::test]
async fn malformed_bodies_are_validation_errors() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_create_order().never();
    let (status, body) =
        post_request("/api/v1/order", r#"{"partner_reference_no": "ref-1""#, |cfg| configure_orders(cfg, provider))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"], "Invalid request body");

    let mut provider = MockProvider::new();
    provider.expect_create_order().never();
    let (status, body) =
        post_request("/api/v1/order", r#"{"partner_reference_no": "ref-1"}"#, |cfg| configure_orders(cfg, provider))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn provider_rejection_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider.expect_create_order().times(1).returning(|_| {
        Err(DanaApiError::Provider {
            status: 400,
            body: "{\n  \"responseCode\": \"4005401\",\n  \"responseMessage\": \"Invalid Field Format\"\n}".into(),
        })
    });
    let (status, body) = post_request("/api/v1/order", HOSTED_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "PROVIDER_ERROR");
    assert_eq!(body["details"]["status"], 400);
    assert!(body["details"]["body"].as_str().unwrap().contains("4005401"));
}

#[actix_web::test]
async fn provider_timeout_is_a_gateway_timeout() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_create_order()
        .times(1)
        .returning(|_| Err(DanaApiError::Timeout("operation timed out".into())));
    let (status, body) = post_request("/api/v1/order", HOSTED_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "NETWORK_ERROR");
}

#[actix_web::test]
async fn bad_key_is_reported_as_key_format_error() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_create_order()
        .times(1)
        .returning(|_| Err(DanaApiError::KeyFormat("invalid private key format: missing PEM headers".into())));
    let (status, body) = post_request("/api/v1/order", HOSTED_ORDER, |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "KEY_FORMAT_ERROR");
    assert_eq!(body["details"], "The configured DANA private key could not be loaded");
}

#[actix_web::test]
async fn fetch_order_by_reference() {
    let _ = env_logger::try_init().ok();
    let mut provider = MockProvider::new();
    provider
        .expect_query_payment()
        .withf(|req| {
            req.original_partner_reference_no == "ref-7" &&
                req.merchant_id == DEFAULT_MERCHANT &&
                req.service_code == "54"
        })
        .times(1)
        .returning(|_| Ok(json!({"responseCode": "2005500", "latestTransactionStatus": "00"})));
    let (status, body) = get_request("/api/v1/order/ref-7", |cfg| configure_orders(cfg, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Order retrieved successfully",
            "data": {"responseCode": "2005500", "latestTransactionStatus": "00"}
        })
    );
}

#[actix_web::test]
async fn payment_methods_on_both_paths() {
    let _ = env_logger::try_init().ok();
    for path in ["/api/v1/payment/method", "/api/v1/order/payment/method"] {
        let mut provider = MockProvider::new();
        provider
            .expect_consult_pay()
            .withf(|req| {
                req.amount.value == "100000.00" &&
                    req.amount.currency == "IDR" &&
                    req.merchant_id == DEFAULT_MERCHANT &&
                    req.additional_info.env_info.source_platform == "IPG"
            })
            .times(1)
            .returning(|_| Ok(json!({"paymentInfos": [{"payMethod": "BALANCE"}]})));
        let (status, body) = get_request(path, |cfg| configure_orders(cfg, provider)).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["message"], "Payment method retrieved successfully");
        assert_eq!(body["data"]["paymentInfos"][0]["payMethod"], "BALANCE");
    }
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/health", |cfg| configure_orders(cfg, MockProvider::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
