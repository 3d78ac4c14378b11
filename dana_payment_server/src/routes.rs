//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every handler awaits exactly one outbound DANA call. If the client disconnects, actix drops the handler future, and
//! the outbound request is dropped along with it.
use actix_web::{get, web, HttpResponse, Responder};
use dana_tools::PaymentProvider;
use log::*;

use crate::{
    data_objects::{CreateOrderRequest, HealthResponse, JsonResponse},
    errors::ServerError,
    merchant_api::MerchantApi,
    order_flow_api::{CheckoutKind, OrderFlowApi},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers the `/api/v1` routes for the given payment provider.
pub fn api_scope<P: PaymentProvider + 'static>() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(MerchantInfoRoute::<P>::new())
        .service(MerchantInfoByIdRoute::<P>::new())
        .service(CreateOrderRoute::<P>::new())
        .service(CreateCustomOrderRoute::<P>::new())
        .service(PaymentMethodsRoute::<P>::new())
        .service(OrderPaymentMethodsRoute::<P>::new())
        .service(OrderByReferenceRoute::<P>::new())
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok()
        .json(HealthResponse { status: "ok".to_string(), message: "DANA payment gateway is running".to_string() })
}

//----------------------------------------------   Merchant  ----------------------------------------------------
route!(merchant_info => Get "/merchant/info" impl PaymentProvider);
/// Balances for the merchant configured in `DANA_MERCHANT_ID`.
pub async fn merchant_info<P: PaymentProvider>(api: web::Data<MerchantApi<P>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET merchant info");
    let info = api.merchant_info(None).await?;
    Ok(HttpResponse::Ok().json(info))
}

route!(merchant_info_by_id => Get "/merchant/info/{merchant_id}" impl PaymentProvider);
pub async fn merchant_info_by_id<P: PaymentProvider>(
    path: web::Path<String>,
    api: web::Data<MerchantApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let merchant_id = path.into_inner();
    debug!("💻️ GET merchant info for {merchant_id}");
    let info = api.merchant_info(Some(&merchant_id)).await?;
    Ok(HttpResponse::Ok().json(info))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/order" impl PaymentProvider);
/// Creates an order. The checkout flavour follows from the body: direct selection when `pay_option_details` is
/// non-empty, hosted checkout otherwise.
pub async fn create_order<P: PaymentProvider>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderFlowApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST order [{}]", req.partner_reference_no);
    let (kind, order) = api.create_order(req).await?;
    let message = match kind {
        CheckoutKind::Direct => "Order created successfully (Custom Checkout)",
        CheckoutKind::Hosted => "Order created successfully",
    };
    Ok(HttpResponse::Ok().json(JsonResponse::success(message, order)))
}

route!(create_custom_order => Post "/order/custom" impl PaymentProvider);
/// Creates a direct selection order. Requests without `pay_option_details` are rejected.
pub async fn create_custom_order<P: PaymentProvider>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderFlowApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST custom order [{}]", req.partner_reference_no);
    let order = api.create_direct_order(req).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Order created successfully (Custom Checkout)", order)))
}

route!(order_by_reference => Get "/order/{partner_reference_no}" impl PaymentProvider);
pub async fn order_by_reference<P: PaymentProvider>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let partner_reference_no = path.into_inner();
    debug!("💻️ GET order [{partner_reference_no}]");
    let order = api.fetch_order(&partner_reference_no).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Order retrieved successfully", order)))
}

//----------------------------------------------   Payment methods  ----------------------------------------------
route!(payment_methods => Get "/payment/method" impl PaymentProvider);
pub async fn payment_methods<P: PaymentProvider>(
    api: web::Data<OrderFlowApi<P>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payment methods");
    let methods = api.payment_methods().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Payment method retrieved successfully", methods)))
}

route!(order_payment_methods => Get "/order/payment/method" impl PaymentProvider);
/// Alias of `/payment/method`, kept for clients that look for it next to the order routes.
pub async fn order_payment_methods<P: PaymentProvider>(
    api: web::Data<OrderFlowApi<P>>,
) -> Result<HttpResponse, ServerError> {
    payment_methods(api).await
}
