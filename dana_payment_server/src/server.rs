use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use dana_tools::DanaApi;
use log::*;

use crate::{
    config::ServerConfig,
    errors::{json_config, ServerError},
    merchant_api::MerchantApi,
    order_flow_api::OrderFlowApi,
    routes::{api_scope, health},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let dana = DanaApi::new(config.dana.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, dana)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Builds the HTTP server around a single DANA client. The client, and with it the connection pool and the signing
/// key, is shared by every worker.
pub fn create_server_instance(config: ServerConfig, dana: DanaApi) -> Result<Server, ServerError> {
    let orders_api = web::Data::new(OrderFlowApi::new(dana.clone(), config.checkout.clone()));
    let merchant_api =
        web::Data::new(MerchantApi::new(dana, config.checkout.merchant_id.clone(), config.dana.environment));
    info!("🚀️ DANA environment: {}. Base URL: {}", config.dana.environment, config.dana.base_url());
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dpg::access_log"))
            .app_data(orders_api.clone())
            .app_data(merchant_api.clone())
            .app_data(json_config())
            .service(health)
            .service(api_scope::<DanaApi>())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
