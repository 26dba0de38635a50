//! API Routes
//!
//! Configures the Axum router with all dashboard endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_booking_handler, create_customer_handler, create_service_record_handler,
    create_staff_handler, dashboard_handler, delete_booking_handler, delete_customer_handler,
    delete_service_record_handler, delete_staff_handler, flush_handler, get_customer_handler,
    get_service_record_handler, health_handler, list_bookings_handler, list_customers_handler,
    list_service_records_handler, list_staff_handler, stats_handler, update_customer_handler,
    update_service_record_handler, update_staff_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/admin/cache", delete(flush_handler))
        .route(
            "/teams/:team_id/customers",
            get(list_customers_handler).post(create_customer_handler),
        )
        .route(
            "/customers/:id",
            get(get_customer_handler)
                .put(update_customer_handler)
                .delete(delete_customer_handler),
        )
        .route(
            "/customers/:id/service-records",
            get(list_service_records_handler).post(create_service_record_handler),
        )
        .route(
            "/teams/:team_id/staff",
            get(list_staff_handler).post(create_staff_handler),
        )
        .route(
            "/service-records/:id",
            get(get_service_record_handler)
                .put(update_service_record_handler)
                .delete(delete_service_record_handler),
        )
        .route(
            "/staff/:id",
            put(update_staff_handler).delete(delete_staff_handler),
        )
        .route(
            "/bookings",
            get(list_bookings_handler).post(create_booking_handler),
        )
        .route("/bookings/:id", delete(delete_booking_handler))
        .route("/teams/:team_id/dashboard", get(dashboard_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
