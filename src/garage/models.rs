//! Garage domain records
//!
//! The rows the dashboard reads and writes. They round-trip through the
//! cache as JSON, so every type is both Serialize and Deserialize.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub team_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub vehicle: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i32,
    pub team_id: i32,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStaffMember {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    pub customer_name: String,
    pub email: String,
    pub service: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub customer_name: String,
    pub email: String,
    pub service: String,
    pub date: NaiveDate,
}

/// Progress of a service job. Only completed jobs count as revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: i32,
    pub team_id: i32,
    pub customer_id: i32,
    pub description: String,
    /// Amount in cents
    pub total_cost: i64,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewServiceRecord {
    pub description: String,
    pub total_cost: i64,
    pub status: ServiceStatus,
}

/// Headline figures of the team dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sum of completed service records, in cents
    pub total_revenue: i64,
    pub total_customers: u64,
    pub total_service_records: u64,
    pub total_staff: u64,
}

/// Completed revenue of one calendar day (UTC), in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: i64,
}

/// Completed revenue of one `YYYY-MM` month, in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: i64,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    /// Last 30 days, oldest first, days without revenue included as zero
    pub chart: Vec<DailyRevenue>,
    /// Months of the last year that had revenue, oldest first
    pub yearly_breakup: Vec<MonthlyRevenue>,
    /// Revenue since the first of the current month, in cents
    pub monthly_earnings: i64,
}

/// One page of a listing plus the total row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}
