use serde_json::Value;

use crate::{
    data_objects::{
        ConsultPayRequest,
        CreateOrderRequest,
        CreateOrderResponse,
        QueryMerchantResourceRequest,
        QueryMerchantResourceResponse,
        QueryPaymentRequest,
    },
    DanaApiError,
};

/// The operations the gateway needs from a payment provider.
///
/// [`crate::DanaApi`] talks to DANA over HTTP. Tests substitute a mock so that the order and merchant flows can be
/// exercised without a network.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// Creates a payment order. A 2xx response is returned verbatim; anything else is a `Provider` error.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreateOrderResponse, DanaApiError>;

    /// Asks DANA which payment methods are available for the given merchant and amount.
    async fn consult_pay(&self, request: ConsultPayRequest) -> Result<Value, DanaApiError>;

    /// Fetches the current status of a previously created order.
    async fn query_payment(&self, request: QueryPaymentRequest) -> Result<Value, DanaApiError>;

    /// Fetches merchant balances.
    async fn query_merchant_resource(
        &self,
        request: QueryMerchantResourceRequest,
    ) -> Result<QueryMerchantResourceResponse, DanaApiError>;
}
