//! Runs the gateway against a stand-in DANA server and checks what actually goes over the wire.

use std::sync::{Arc, Mutex};

use actix_web::{http::StatusCode, rt, test::TestRequest, web, App, HttpRequest, HttpResponse, HttpServer};
use dana_tools::{DanaApi, DanaConfig, SigningContext, CREATE_ORDER_PATH};
use rsa::{
    pkcs1v15::{Signature, VerifyingKey},
    pkcs8::DecodePublicKey,
    signature::Verifier,
    RsaPublicKey,
};
use serde_json::json;
use sha2::Sha256;

use super::helpers::{configure_apis, send};

const PRIVATE_KEY: &str = include_str!("../../../dana_tools/test_data/rsa_pkcs1.pem");
const PUBLIC_KEY: &str = include_str!("../../../dana_tools/test_data/rsa_public.pem");

#[derive(Debug, Clone, Default)]
struct Received {
    path: String,
    timestamp: String,
    signature: String,
    partner_id: String,
    body: Vec<u8>,
}

type Inbox = Arc<Mutex<Vec<Received>>>;

async fn fake_dana(req: HttpRequest, body: web::Bytes, inbox: web::Data<Inbox>) -> HttpResponse {
    let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    inbox.lock().unwrap().push(Received {
        path: req.path().to_string(),
        timestamp: header("X-TIMESTAMP"),
        signature: header("X-SIGNATURE"),
        partner_id: header("X-PARTNER-ID"),
        body: body.to_vec(),
    });
    HttpResponse::Ok().json(json!({
        "responseCode": "2005400",
        "responseMessage": "Successful",
        "partnerReferenceNo": "e2e-1",
        "webRedirectUrl": "https://m.sandbox.dana.id/checkout?bizNo=e2e"
    }))
}

fn verify(message: &str, signature: &str) -> bool {
    let key = VerifyingKey::<Sha256>::new(RsaPublicKey::from_public_key_pem(PUBLIC_KEY).unwrap());
    let bytes = base64::decode(signature).unwrap();
    let signature = Signature::try_from(bytes.as_slice()).unwrap();
    key.verify(message.as_bytes(), &signature).is_ok()
}

#[actix_web::test]
async fn signed_order_reaches_dana_intact() {
    let _ = env_logger::try_init().ok();
    let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
    let data = web::Data::new(inbox.clone());
    let server = HttpServer::new(move || App::new().app_data(data.clone()).default_service(web::to(fake_dana)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let port = server.addrs()[0].port();
    rt::spawn(server.run());

    let mut config = DanaConfig::new("client-e2e", PRIVATE_KEY, "secret");
    config.host = Some(format!("127.0.0.1:{port}"));
    config.scheme = "http".to_string();
    let dana = DanaApi::new(config).unwrap();

    let order = r#"{
        "partner_reference_no": "e2e-1",
        "amount": {"value": "50000", "currency": "IDR"},
        "url_params": [{"url": "https://shop.example.com/notify", "type": "NOTIFICATION", "is_deeplink": "true"}]
    }"#;
    let req = TestRequest::post()
        .uri("/api/v1/order")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(order);
    let (status, body) = send::<DanaApi, _>(req, |cfg| configure_apis(cfg, dana.clone(), dana.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["webRedirectUrl"], "https://m.sandbox.dana.id/checkout?bizNo=e2e");

    let received = inbox.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    let received = &received[0];
    assert_eq!(received.path, CREATE_ORDER_PATH);
    assert_eq!(received.partner_id, "client-e2e");
    let wire = String::from_utf8(received.body.clone()).unwrap();
    assert!(wire.contains(r#""amount":{"value":"50000.00","currency":"IDR"}"#), "{wire}");
    assert!(wire.contains(r#""isDeeplink":"N""#), "{wire}");
    assert!(!wire.contains(": "), "body should be compact: {wire}");

    let message =
        SigningContext::new("POST", CREATE_ORDER_PATH, &received.body, received.timestamp.clone()).string_to_sign();
    assert!(verify(&message, &received.signature));

    let mut tampered = received.body.clone();
    let last = tampered.len() - 2;
    tampered[last] ^= 0x01;
    let message = SigningContext::new("POST", CREATE_ORDER_PATH, &tampered, received.timestamp.clone()).string_to_sign();
    assert!(!verify(&message, &received.signature));
}
