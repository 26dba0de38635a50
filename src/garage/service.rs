//! Garage service
//!
//! Every read goes through `Cache::get_cached`; every write invalidates the
//! keys derived from the touched entity before returning.

use std::sync::Arc;

use chrono::{Datelike, Days, Months, NaiveDate, Utc};

use crate::cache::{keys, Cache, Ttl};
use crate::garage::models::{
    Booking, Customer, DailyRevenue, Dashboard, DashboardStats, MonthlyRevenue, NewBooking,
    NewCustomer, NewServiceRecord, NewStaffMember, Page, ServiceRecord, StaffMember,
};
use crate::garage::repository::{GarageRepository, RepoResult};

/// Largest page a listing may request.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Days shown on the dashboard revenue chart, today included.
pub const CHART_DAYS: u64 = 30;
/// Calendar months in the yearly breakup, the current one included.
pub const BREAKUP_MONTHS: u32 = 12;

// == Page Request ==
/// Normalized pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Pages start at 1; the size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// == Garage Service ==
#[derive(Clone)]
pub struct GarageService {
    repo: Arc<dyn GarageRepository>,
    cache: Cache,
}

impl GarageService {
    pub fn new(repo: Arc<dyn GarageRepository>, cache: Cache) -> Self {
        Self { repo, cache }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    // == Customers ==
    pub async fn customers(&self, team_id: i32, req: PageRequest) -> RepoResult<Page<Customer>> {
        let items = self
            .cache
            .get_cached(
                &keys::customers(team_id, req.page, req.page_size),
                Ttl::Medium,
                || self.repo.list_customers(team_id, req.offset(), req.limit()),
            )
            .await?;
        let total = self.customers_count(team_id).await?;

        Ok(Page {
            items,
            page: req.page,
            page_size: req.page_size,
            total,
        })
    }

    pub async fn customers_count(&self, team_id: i32) -> RepoResult<u64> {
        self.cache
            .get_cached(&keys::customers_count(team_id), Ttl::Medium, || {
                self.repo.count_customers(team_id)
            })
            .await
    }

    pub async fn customer(&self, id: i32) -> RepoResult<Customer> {
        self.cache
            .get_cached(&keys::customer(id), Ttl::Medium, || {
                self.repo.find_customer(id)
            })
            .await
    }

    pub async fn create_customer(&self, team_id: i32, new: NewCustomer) -> RepoResult<Customer> {
        let customer = self.repo.insert_customer(team_id, new).await?;
        self.cache.invalidate_customers(team_id).await;
        Ok(customer)
    }

    pub async fn update_customer(&self, id: i32, changes: NewCustomer) -> RepoResult<Customer> {
        let customer = self.repo.update_customer(id, changes).await?;
        self.cache.invalidate_customer(id, customer.team_id).await;
        Ok(customer)
    }

    /// Removes a customer together with their service history.
    pub async fn delete_customer(&self, id: i32) -> RepoResult<Customer> {
        let customer = self.repo.delete_customer(id).await?;
        self.cache.invalidate_customer(id, customer.team_id).await;
        self.cache
            .invalidate_service_records(id, customer.team_id)
            .await;
        Ok(customer)
    }

    // == Staff ==
    pub async fn staff(&self, team_id: i32, req: PageRequest) -> RepoResult<Page<StaffMember>> {
        let items = self
            .cache
            .get_cached(
                &keys::staff(team_id, req.page, req.page_size),
                Ttl::Medium,
                || self.repo.list_staff(team_id, req.offset(), req.limit()),
            )
            .await?;
        let total = self.staff_count(team_id).await?;

        Ok(Page {
            items,
            page: req.page,
            page_size: req.page_size,
            total,
        })
    }

    pub async fn staff_count(&self, team_id: i32) -> RepoResult<u64> {
        self.cache
            .get_cached(&keys::staff_count(team_id), Ttl::Medium, || {
                self.repo.count_staff(team_id)
            })
            .await
    }

    pub async fn create_staff(&self, team_id: i32, new: NewStaffMember) -> RepoResult<StaffMember> {
        let member = self.repo.insert_staff(team_id, new).await?;
        self.cache.invalidate_staff(team_id).await;
        Ok(member)
    }

    pub async fn update_staff(&self, id: i32, changes: NewStaffMember) -> RepoResult<StaffMember> {
        let member = self.repo.update_staff(id, changes).await?;
        self.cache.invalidate_staff(member.team_id).await;
        Ok(member)
    }

    pub async fn delete_staff(&self, id: i32) -> RepoResult<StaffMember> {
        let member = self.repo.delete_staff(id).await?;
        self.cache.invalidate_staff(member.team_id).await;
        Ok(member)
    }

    // == Bookings ==
    pub async fn bookings(&self, req: PageRequest) -> RepoResult<Page<Booking>> {
        let items = self
            .cache
            .get_cached(&keys::bookings(req.page, req.page_size), Ttl::Short, || {
                self.repo.list_bookings(req.offset(), req.limit())
            })
            .await?;
        let total = self.bookings_count().await?;

        Ok(Page {
            items,
            page: req.page,
            page_size: req.page_size,
            total,
        })
    }

    pub async fn bookings_count(&self) -> RepoResult<u64> {
        self.cache
            .get_cached(&keys::bookings_count(), Ttl::Short, || {
                self.repo.count_bookings()
            })
            .await
    }

    pub async fn create_booking(&self, new: NewBooking) -> RepoResult<Booking> {
        let booking = self.repo.insert_booking(new).await?;
        self.cache.invalidate_bookings().await;
        Ok(booking)
    }

    pub async fn delete_booking(&self, id: i32) -> RepoResult<Booking> {
        let booking = self.repo.delete_booking(id).await?;
        self.cache.invalidate_bookings().await;
        Ok(booking)
    }

    // == Service Records ==
    pub async fn service_records(&self, customer_id: i32) -> RepoResult<Vec<ServiceRecord>> {
        self.cache
            .get_cached(&keys::service_records(customer_id), Ttl::Medium, || {
                self.repo.list_service_records(customer_id)
            })
            .await
    }

    pub async fn create_service_record(
        &self,
        customer_id: i32,
        new: NewServiceRecord,
    ) -> RepoResult<ServiceRecord> {
        let record = self.repo.insert_service_record(customer_id, new).await?;
        self.cache
            .invalidate_service_records(customer_id, record.team_id)
            .await;
        Ok(record)
    }

    /// Single record, read straight from the repository.
    pub async fn service_record(&self, id: i32) -> RepoResult<ServiceRecord> {
        self.repo.find_service_record(id).await
    }

    /// Status changes move revenue, so the dashboard is refreshed as well.
    pub async fn update_service_record(
        &self,
        id: i32,
        changes: NewServiceRecord,
    ) -> RepoResult<ServiceRecord> {
        let record = self.repo.update_service_record(id, changes).await?;
        self.cache
            .invalidate_service_records(record.customer_id, record.team_id)
            .await;
        Ok(record)
    }

    pub async fn delete_service_record(&self, id: i32) -> RepoResult<ServiceRecord> {
        let record = self.repo.delete_service_record(id).await?;
        self.cache
            .invalidate_service_records(record.customer_id, record.team_id)
            .await;
        Ok(record)
    }

    // == Dashboard ==
    /// Headline figures plus the revenue series.
    pub async fn dashboard(&self, team_id: i32) -> RepoResult<Dashboard> {
        let today = Utc::now().date_naive();
        let chart_start = today
            .checked_sub_days(Days::new(CHART_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);
        let month_start = first_of_month(today);
        let breakup_start = month_start
            .checked_sub_months(Months::new(BREAKUP_MONTHS - 1))
            .unwrap_or(NaiveDate::MIN);

        let chart_key = keys::daily_revenue(team_id);
        let breakup_key = keys::yearly_breakup(team_id);
        let earnings_key = keys::monthly_earnings(team_id);
        let repo = &self.repo;

        let (stats, chart, yearly_breakup, monthly_earnings) = tokio::try_join!(
            self.dashboard_stats(team_id),
            self.cache.get_cached(&chart_key, Ttl::Medium, move || async move {
                repo.completed_revenue_by_day(team_id, chart_start)
                    .await
                    .map(|days| fill_daily(&days, chart_start, CHART_DAYS))
            }),
            self.cache.get_cached(&breakup_key, Ttl::Medium, move || async move {
                repo.completed_revenue_by_day(team_id, breakup_start)
                    .await
                    .map(|days| group_by_month(&days))
            }),
            self.cache.get_cached(&earnings_key, Ttl::Medium, move || async move {
                repo.completed_revenue_by_day(team_id, month_start)
                    .await
                    .map(|days| days.iter().map(|d| d.revenue).sum::<i64>())
            }),
        )?;

        Ok(Dashboard {
            stats,
            chart,
            yearly_breakup,
            monthly_earnings,
        })
    }

    /// Headline figures, each cached on its own so that a write only
    /// recomputes what it touched.
    pub async fn dashboard_stats(&self, team_id: i32) -> RepoResult<DashboardStats> {
        let revenue_key = keys::dashboard_revenue(team_id);
        let records_key = keys::service_records_count(team_id);

        let (total_revenue, total_customers, total_service_records, total_staff) = tokio::try_join!(
            self.cache.get_cached(&revenue_key, Ttl::Medium, || {
                self.repo.completed_revenue(team_id)
            }),
            self.customers_count(team_id),
            self.cache.get_cached(&records_key, Ttl::Medium, || {
                self.repo.count_service_records(team_id)
            }),
            self.staff_count(team_id),
        )?;

        Ok(DashboardStats {
            total_revenue,
            total_customers,
            total_service_records,
            total_staff,
        })
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(date)
}

/// One entry per day from `start`, zero where `days` has none.
fn fill_daily(days: &[DailyRevenue], start: NaiveDate, count: u64) -> Vec<DailyRevenue> {
    start
        .iter_days()
        .take(count as usize)
        .map(|date| DailyRevenue {
            date,
            revenue: days
                .iter()
                .find(|d| d.date == date)
                .map_or(0, |d| d.revenue),
        })
        .collect()
}

/// Sums daily rows into `YYYY-MM` buckets. `days` must be sorted.
fn group_by_month(days: &[DailyRevenue]) -> Vec<MonthlyRevenue> {
    let mut months: Vec<MonthlyRevenue> = Vec::new();
    for day in days {
        let month = day.date.format("%Y-%m").to_string();
        match months.last_mut() {
            Some(last) if last.month == month => last.revenue += day.revenue,
            _ => months.push(MonthlyRevenue {
                month,
                revenue: day.revenue,
            }),
        }
    }
    months
}
