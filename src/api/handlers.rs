//! API Handlers
//!
//! HTTP request handlers for the dashboard endpoints. Reads go through the
//! cached service; writes invalidate inside the service before responding.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::{Cache, KvStore};
use crate::error::{ApiError, Result};
use crate::garage::models::{Booking, Customer, Dashboard, Page, ServiceRecord, StaffMember};
use crate::garage::{GarageRepository, GarageService, MemoryRepository};
use crate::models::{
    BookingRequest, CustomerRequest, DeletedResponse, FlushResponse, HealthResponse, PageQuery,
    ServiceRecordRequest, StaffRequest, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: GarageService,
}

impl AppState {
    /// Creates a new AppState over a repository and a store adapter.
    pub fn new(repo: Arc<dyn GarageRepository>, store: KvStore) -> Self {
        Self {
            service: GarageService::new(repo, Cache::new(store)),
        }
    }

    /// In-memory tables with the given store adapter.
    pub fn in_memory(store: KvStore) -> Self {
        Self::new(Arc::new(MemoryRepository::new()), store)
    }

    pub fn cache(&self) -> &Cache {
        self.service.cache()
    }
}

/// Turns a failed validation message into a 400.
fn validated(message: Option<String>) -> Result<()> {
    match message {
        Some(msg) => Err(ApiError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

// == Operations ==

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.cache().store();
    Json(StatsResponse::new(
        store.status().clone(),
        store.backend_name(),
        store.stats(),
    ))
}

/// Handler for DELETE /admin/cache
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    state.cache().flush_all().await;
    Json(FlushResponse::new())
}

// == Customers ==

/// Handler for GET /teams/:team_id/customers
pub async fn list_customers_handler(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Customer>>> {
    let page = state.service.customers(team_id, query.into()).await?;
    Ok(Json(page))
}

/// Handler for POST /teams/:team_id/customers
pub async fn create_customer_handler(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Json(req): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<Customer>)> {
    validated(req.validate())?;
    let customer = state
        .service
        .create_customer(team_id, req.into_new())
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Handler for GET /customers/:id
pub async fn get_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Customer>> {
    Ok(Json(state.service.customer(id).await?))
}

/// Handler for PUT /customers/:id
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<Customer>> {
    validated(req.validate())?;
    Ok(Json(state.service.update_customer(id, req.into_new()).await?))
}

/// Handler for DELETE /customers/:id
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>> {
    state.service.delete_customer(id).await?;
    Ok(Json(DeletedResponse::new("customer", id)))
}

// == Staff ==

/// Handler for GET /teams/:team_id/staff
pub async fn list_staff_handler(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<StaffMember>>> {
    Ok(Json(state.service.staff(team_id, query.into()).await?))
}

/// Handler for POST /teams/:team_id/staff
pub async fn create_staff_handler(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    Json(req): Json<StaffRequest>,
) -> Result<(StatusCode, Json<StaffMember>)> {
    validated(req.validate())?;
    let member = state.service.create_staff(team_id, req.into_new()).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Handler for PUT /staff/:id
pub async fn update_staff_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<StaffRequest>,
) -> Result<Json<StaffMember>> {
    validated(req.validate())?;
    Ok(Json(state.service.update_staff(id, req.into_new()).await?))
}

/// Handler for DELETE /staff/:id
pub async fn delete_staff_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>> {
    state.service.delete_staff(id).await?;
    Ok(Json(DeletedResponse::new("staff", id)))
}

// == Bookings ==

/// Handler for GET /bookings
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Booking>>> {
    Ok(Json(state.service.bookings(query.into()).await?))
}

/// Handler for POST /bookings
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>)> {
    validated(req.validate())?;
    let booking = state.service.create_booking(req.into_new()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for DELETE /bookings/:id
pub async fn delete_booking_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>> {
    state.service.delete_booking(id).await?;
    Ok(Json(DeletedResponse::new("booking", id)))
}

// == Service Records ==

/// Handler for GET /customers/:id/service-records
pub async fn list_service_records_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<ServiceRecord>>> {
    Ok(Json(state.service.service_records(customer_id).await?))
}

/// Handler for POST /customers/:id/service-records
pub async fn create_service_record_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    Json(req): Json<ServiceRecordRequest>,
) -> Result<(StatusCode, Json<ServiceRecord>)> {
    validated(req.validate())?;
    let record = state
        .service
        .create_service_record(customer_id, req.into_new())
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /service-records/:id
pub async fn get_service_record_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ServiceRecord>> {
    Ok(Json(state.service.service_record(id).await?))
}

/// Handler for PUT /service-records/:id
pub async fn update_service_record_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ServiceRecordRequest>,
) -> Result<Json<ServiceRecord>> {
    validated(req.validate())?;
    let record = state
        .service
        .update_service_record(id, req.into_new())
        .await?;
    Ok(Json(record))
}

/// Handler for DELETE /service-records/:id
pub async fn delete_service_record_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>> {
    state.service.delete_service_record(id).await?;
    Ok(Json(DeletedResponse::new("service record", id)))
}

// == Dashboard ==

/// Handler for GET /teams/:team_id/dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
) -> Result<Json<Dashboard>> {
    Ok(Json(state.service.dashboard(team_id).await?))
}
