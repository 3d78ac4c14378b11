//! # DANA payment gateway server
//! This crate hosts the HTTP front end of the gateway. It is responsible for:
//! Accepting order, order status, payment method and merchant balance requests from merchant systems.
//! Turning them into signed calls against the DANA API (see `dana_tools`).
//! Reshaping DANA's answers into the gateway's JSON envelope.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route.
//! * `/api/v1/merchant/info[/{merchant_id}]`: Merchant balances.
//! * `/api/v1/order`: Create an order. Direct selection or hosted checkout, depending on the body.
//! * `/api/v1/order/custom`: Create a direct selection order.
//! * `/api/v1/order/{partner_reference_no}`: Order status.
//! * `/api/v1/payment/method`: Available payment methods.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod merchant_api;
pub mod order_flow_api;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
