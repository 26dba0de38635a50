//! API Module
//!
//! HTTP handlers and routing for the dashboard API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache status and counters
//! - `DELETE /admin/cache` - Flush the cache
//! - `GET|POST /teams/:team_id/customers` - Customer listing / creation
//! - `GET|PUT|DELETE /customers/:id` - Single customer
//! - `GET|POST /customers/:id/service-records` - Service history
//! - `GET|PUT|DELETE /service-records/:id` - Single service record
//! - `GET|POST /teams/:team_id/staff`, `PUT|DELETE /staff/:id` - Staff
//! - `GET|POST /bookings`, `DELETE /bookings/:id` - Bookings
//! - `GET /teams/:team_id/dashboard` - Dashboard figures and revenue series

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
