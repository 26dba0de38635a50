//! Persistence interface
//!
//! `GarageRepository` is the seam to the relational store. `MemoryRepository`
//! implements it in-process for the bundled server and the tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::error::RepositoryError;
use crate::garage::models::{
    Booking, Customer, DailyRevenue, NewBooking, NewCustomer, NewServiceRecord, NewStaffMember,
    ServiceRecord, ServiceStatus, StaffMember,
};

/// Convenience Result type for repository calls.
pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

// == Garage Repository ==
/// CRUD over the garage tables. Listings are ordered by id.
#[async_trait]
pub trait GarageRepository: Send + Sync {
    // Customers
    async fn list_customers(
        &self,
        team_id: i32,
        offset: u64,
        limit: u64,
    ) -> RepoResult<Vec<Customer>>;
    async fn count_customers(&self, team_id: i32) -> RepoResult<u64>;
    async fn find_customer(&self, id: i32) -> RepoResult<Customer>;
    async fn insert_customer(&self, team_id: i32, new: NewCustomer) -> RepoResult<Customer>;
    async fn update_customer(&self, id: i32, changes: NewCustomer) -> RepoResult<Customer>;
    async fn delete_customer(&self, id: i32) -> RepoResult<Customer>;

    // Staff
    async fn list_staff(
        &self,
        team_id: i32,
        offset: u64,
        limit: u64,
    ) -> RepoResult<Vec<StaffMember>>;
    async fn count_staff(&self, team_id: i32) -> RepoResult<u64>;
    async fn insert_staff(&self, team_id: i32, new: NewStaffMember) -> RepoResult<StaffMember>;
    async fn update_staff(&self, id: i32, changes: NewStaffMember) -> RepoResult<StaffMember>;
    async fn delete_staff(&self, id: i32) -> RepoResult<StaffMember>;

    // Bookings
    async fn list_bookings(&self, offset: u64, limit: u64) -> RepoResult<Vec<Booking>>;
    async fn count_bookings(&self) -> RepoResult<u64>;
    async fn insert_booking(&self, new: NewBooking) -> RepoResult<Booking>;
    async fn delete_booking(&self, id: i32) -> RepoResult<Booking>;

    // Service records
    async fn list_service_records(&self, customer_id: i32) -> RepoResult<Vec<ServiceRecord>>;
    async fn insert_service_record(
        &self,
        customer_id: i32,
        new: NewServiceRecord,
    ) -> RepoResult<ServiceRecord>;
    async fn find_service_record(&self, id: i32) -> RepoResult<ServiceRecord>;
    async fn update_service_record(
        &self,
        id: i32,
        changes: NewServiceRecord,
    ) -> RepoResult<ServiceRecord>;
    async fn delete_service_record(&self, id: i32) -> RepoResult<ServiceRecord>;
    async fn count_service_records(&self, team_id: i32) -> RepoResult<u64>;
    /// Sum of completed records of a team, in cents.
    async fn completed_revenue(&self, team_id: i32) -> RepoResult<i64>;
    /// Completed revenue per creation day from `since` on, oldest first.
    /// Days without completed records are absent.
    async fn completed_revenue_by_day(
        &self,
        team_id: i32,
        since: NaiveDate,
    ) -> RepoResult<Vec<DailyRevenue>>;
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    customers: Vec<Customer>,
    staff: Vec<StaffMember>,
    bookings: Vec<Booking>,
    service_records: Vec<ServiceRecord>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

fn page<T: Clone>(rows: impl Iterator<Item = T>, offset: u64, limit: u64) -> Vec<T> {
    rows.skip(offset as usize).take(limit as usize).collect()
}

// == Memory Repository ==
/// In-process tables.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    failing: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a query error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepositoryError::Query("database unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GarageRepository for MemoryRepository {
    async fn list_customers(
        &self,
        team_id: i32,
        offset: u64,
        limit: u64,
    ) -> RepoResult<Vec<Customer>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(page(
            tables.customers.iter().filter(|c| c.team_id == team_id).cloned(),
            offset,
            limit,
        ))
    }

    async fn count_customers(&self, team_id: i32) -> RepoResult<u64> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().filter(|c| c.team_id == team_id).count() as u64)
    }

    async fn find_customer(&self, id: i32) -> RepoResult<Customer> {
        self.check()?;
        let tables = self.tables.read().await;
        tables
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound {
                entity: "customer",
                id,
            })
    }

    async fn insert_customer(&self, team_id: i32, new: NewCustomer) -> RepoResult<Customer> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let customer = Customer {
            id: tables.next_id(),
            team_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            vehicle: new.vehicle,
            created_at: Utc::now(),
        };
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: i32, changes: NewCustomer) -> RepoResult<Customer> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let customer = tables
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound {
                entity: "customer",
                id,
            })?;
        customer.name = changes.name;
        customer.email = changes.email;
        customer.phone = changes.phone;
        customer.vehicle = changes.vehicle;
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: i32) -> RepoResult<Customer> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let index = tables
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepositoryError::NotFound {
                entity: "customer",
                id,
            })?;
        tables.service_records.retain(|r| r.customer_id != id);
        Ok(tables.customers.remove(index))
    }

    async fn list_staff(
        &self,
        team_id: i32,
        offset: u64,
        limit: u64,
    ) -> RepoResult<Vec<StaffMember>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(page(
            tables.staff.iter().filter(|s| s.team_id == team_id).cloned(),
            offset,
            limit,
        ))
    }

    async fn count_staff(&self, team_id: i32) -> RepoResult<u64> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.staff.iter().filter(|s| s.team_id == team_id).count() as u64)
    }

    async fn insert_staff(&self, team_id: i32, new: NewStaffMember) -> RepoResult<StaffMember> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let member = StaffMember {
            id: tables.next_id(),
            team_id,
            name: new.name,
            role: new.role,
            created_at: Utc::now(),
        };
        tables.staff.push(member.clone());
        Ok(member)
    }

    async fn update_staff(&self, id: i32, changes: NewStaffMember) -> RepoResult<StaffMember> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let member = tables
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound { entity: "staff", id })?;
        member.name = changes.name;
        member.role = changes.role;
        Ok(member.clone())
    }

    async fn delete_staff(&self, id: i32) -> RepoResult<StaffMember> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let index = tables
            .staff
            .iter()
            .position(|s| s.id == id)
            .ok_or(RepositoryError::NotFound { entity: "staff", id })?;
        Ok(tables.staff.remove(index))
    }

    async fn list_bookings(&self, offset: u64, limit: u64) -> RepoResult<Vec<Booking>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(page(tables.bookings.iter().cloned(), offset, limit))
    }

    async fn count_bookings(&self) -> RepoResult<u64> {
        self.check()?;
        Ok(self.tables.read().await.bookings.len() as u64)
    }

    async fn insert_booking(&self, new: NewBooking) -> RepoResult<Booking> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let booking = Booking {
            id: tables.next_id(),
            customer_name: new.customer_name,
            email: new.email,
            service: new.service,
            date: new.date,
            created_at: Utc::now(),
        };
        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn delete_booking(&self, id: i32) -> RepoResult<Booking> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let index = tables
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(RepositoryError::NotFound {
                entity: "booking",
                id,
            })?;
        Ok(tables.bookings.remove(index))
    }

    async fn list_service_records(&self, customer_id: i32) -> RepoResult<Vec<ServiceRecord>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .service_records
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn insert_service_record(
        &self,
        customer_id: i32,
        new: NewServiceRecord,
    ) -> RepoResult<ServiceRecord> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let team_id = tables
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .map(|c| c.team_id)
            .ok_or(RepositoryError::NotFound {
                entity: "customer",
                id: customer_id,
            })?;
        let record = ServiceRecord {
            id: tables.next_id(),
            team_id,
            customer_id,
            description: new.description,
            total_cost: new.total_cost,
            status: new.status,
            created_at: Utc::now(),
        };
        tables.service_records.push(record.clone());
        Ok(record)
    }

    async fn find_service_record(&self, id: i32) -> RepoResult<ServiceRecord> {
        self.check()?;
        let tables = self.tables.read().await;
        tables
            .service_records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound {
                entity: "service record",
                id,
            })
    }

    async fn update_service_record(
        &self,
        id: i32,
        changes: NewServiceRecord,
    ) -> RepoResult<ServiceRecord> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let record = tables
            .service_records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound {
                entity: "service record",
                id,
            })?;
        record.description = changes.description;
        record.total_cost = changes.total_cost;
        record.status = changes.status;
        Ok(record.clone())
    }

    async fn delete_service_record(&self, id: i32) -> RepoResult<ServiceRecord> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let index = tables
            .service_records
            .iter()
            .position(|r| r.id == id)
            .ok_or(RepositoryError::NotFound {
                entity: "service record",
                id,
            })?;
        Ok(tables.service_records.remove(index))
    }

    async fn count_service_records(&self, team_id: i32) -> RepoResult<u64> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .service_records
            .iter()
            .filter(|r| r.team_id == team_id)
            .count() as u64)
    }

    async fn completed_revenue(&self, team_id: i32) -> RepoResult<i64> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .service_records
            .iter()
            .filter(|r| r.team_id == team_id && r.status == ServiceStatus::Completed)
            .map(|r| r.total_cost)
            .sum())
    }

    async fn completed_revenue_by_day(
        &self,
        team_id: i32,
        since: NaiveDate,
    ) -> RepoResult<Vec<DailyRevenue>> {
        self.check()?;
        let tables = self.tables.read().await;
        let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for record in tables.service_records.iter().filter(|r| {
            r.team_id == team_id
                && r.status == ServiceStatus::Completed
                && r.created_at.date_naive() >= since
        }) {
            *days.entry(record.created_at.date_naive()).or_default() += record.total_cost;
        }
        Ok(days
            .into_iter()
            .map(|(date, revenue)| DailyRevenue { date, revenue })
            .collect())
    }
}
