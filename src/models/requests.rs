//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming query strings and request bodies.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::garage::models::{
    NewBooking, NewCustomer, NewServiceRecord, NewStaffMember, ServiceStatus,
};
use crate::garage::PageRequest;

/// Maximum length accepted for names and free-text fields
pub const MAX_TEXT_LENGTH: usize = 256;

fn check_text(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field} cannot be empty"));
    }
    if value.len() > MAX_TEXT_LENGTH {
        return Some(format!(
            "{field} exceeds maximum length of {MAX_TEXT_LENGTH} characters"
        ));
    }
    None
}

/// Pagination query (`?page=2&page_size=25`)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page, query.page_size)
    }
}

/// Body for creating or updating a customer
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
}

impl CustomerRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = check_text("name", &self.name) {
            return Some(msg);
        }
        match &self.email {
            Some(email) if !email.contains('@') => Some("email is not valid".to_string()),
            _ => None,
        }
    }

    pub fn into_new(self) -> NewCustomer {
        NewCustomer {
            name: self.name.trim().to_string(),
            email: self.email,
            phone: self.phone,
            vehicle: self.vehicle,
        }
    }
}

/// Body for adding a staff member
#[derive(Debug, Clone, Deserialize)]
pub struct StaffRequest {
    pub name: String,
    pub role: String,
}

impl StaffRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("name", &self.name).or_else(|| check_text("role", &self.role))
    }

    pub fn into_new(self) -> NewStaffMember {
        NewStaffMember {
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
        }
    }
}

/// Body for a booking made from the public site
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub customer_name: String,
    pub email: String,
    pub service: String,
    pub date: NaiveDate,
}

impl BookingRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("customer_name", &self.customer_name)
            .or_else(|| check_text("service", &self.service))
            .or_else(|| {
                (!self.email.contains('@')).then(|| "email is not valid".to_string())
            })
    }

    pub fn into_new(self) -> NewBooking {
        NewBooking {
            customer_name: self.customer_name.trim().to_string(),
            email: self.email,
            service: self.service.trim().to_string(),
            date: self.date,
        }
    }
}

/// Body for logging work on a customer's vehicle
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRecordRequest {
    pub description: String,
    /// Amount in cents
    pub total_cost: i64,
    #[serde(default = "default_status")]
    pub status: ServiceStatus,
}

fn default_status() -> ServiceStatus {
    ServiceStatus::Pending
}

impl ServiceRecordRequest {
    pub fn validate(&self) -> Option<String> {
        if self.total_cost < 0 {
            return Some("total_cost cannot be negative".to_string());
        }
        check_text("description", &self.description)
    }

    pub fn into_new(self) -> NewServiceRecord {
        NewServiceRecord {
            description: self.description,
            total_cost: self.total_cost,
            status: self.status,
        }
    }
}
