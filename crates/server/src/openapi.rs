//! OpenAPI document served under `/docs`. Request bodies are described by
//! doc-only schemas so the service crate stays free of utoipa.

use rust_decimal::Decimal;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub phone: Option<String>, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CartLineRequest { pub product_price_id: Uuid, pub quantity: i32 }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub address_id: Uuid,
    /// Omit to check out the whole cart.
    pub items: Option<Vec<CartLineRequest>>,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: Uuid,
    pub provider_order_id: String,
    pub provider_payment_id: String,
    pub signature: String,
    pub method: Option<String>,
}

#[derive(ToSchema)]
pub struct RefundRequest {
    #[schema(value_type = String, example = "120.00")]
    pub amount: Decimal,
    pub reason: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub order_id: Uuid,
    #[schema(example = "dtdc")]
    pub carrier: String,
    pub weight_grams: Option<u32>,
    pub pieces: Option<u32>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AnalyticsEventRequest {
    pub session_id: Option<String>,
    #[schema(example = "product_view")]
    pub event_type: String,
    pub path: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<serde_json::Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::profile,
        crate::routes::catalog::featured,
        crate::routes::catalog::search,
        crate::routes::catalog::by_category,
        crate::routes::catalog::detail,
        crate::routes::catalog::adjust_inventory,
        crate::routes::cart::view,
        crate::routes::cart::add,
        crate::routes::checkout::create_order,
        crate::routes::checkout::verify_payment,
        crate::routes::checkout::list_orders,
        crate::routes::checkout::get_order,
        crate::routes::invoice::html,
        crate::routes::invoice::pdf,
        crate::routes::shipment::create,
        crate::routes::shipment::for_order,
        crate::routes::shipment::refresh,
        crate::routes::analytics::record,
        crate::routes::admin::list_orders,
        crate::routes::admin::update_status,
        crate::routes::admin::refund_order,
        crate::routes::admin::third_party_logs,
        crate::routes::admin::analytics_summary,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CartLineRequest,
            CreateOrderRequest,
            VerifyPaymentRequest,
            RefundRequest,
            CreateShipmentRequest,
            AnalyticsEventRequest,
            crate::routes::catalog::AdjustInput,
            crate::routes::admin::StatusInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "catalog"),
        (name = "cart"),
        (name = "checkout"),
        (name = "orders"),
        (name = "invoice"),
        (name = "shipment"),
        (name = "analytics"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_storefront_and_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/Checkout/create-order"));
        assert!(paths.contains_key("/Invoice/{orderId}/pdf"));
        assert!(paths.contains_key("/Admin/orders/{id}/refund"));
    }
}
