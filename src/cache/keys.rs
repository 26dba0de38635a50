//! Cache Key Registry
//!
//! Deterministic key builders, one per cached query. Every key has the shape
//! `tag[:param]*` where each tag is unique and every parameter is an integer,
//! so two different builders or parameter tuples never produce the same key.

// == Customers ==
/// Single customer row.
pub fn customer(id: i32) -> String {
    format!("customer:{id}")
}

/// One page of a team's customer listing.
pub fn customers(team_id: i32, page: u32, page_size: u32) -> String {
    format!("customers:{team_id}:{page}:{page_size}")
}

pub fn customers_count(team_id: i32) -> String {
    format!("customers_count:{team_id}")
}

// == Staff ==
/// One page of a team's staff listing.
pub fn staff(team_id: i32, page: u32, page_size: u32) -> String {
    format!("staff:{team_id}:{page}:{page_size}")
}

pub fn staff_count(team_id: i32) -> String {
    format!("staff_count:{team_id}")
}

// == Bookings ==
/// One page of the booking listing. Bookings are not team scoped.
pub fn bookings(page: u32, page_size: u32) -> String {
    format!("bookings:{page}:{page_size}")
}

pub fn bookings_count() -> String {
    "bookings_count".to_string()
}

// == Service Records ==
/// Service history of one customer.
pub fn service_records(customer_id: i32) -> String {
    format!("service_records:{customer_id}")
}

// == Dashboard Aggregates ==
pub fn dashboard_revenue(team_id: i32) -> String {
    format!("dashboard_revenue:{team_id}")
}

pub fn service_records_count(team_id: i32) -> String {
    format!("service_records_count:{team_id}")
}

pub fn daily_revenue(team_id: i32) -> String {
    format!("daily_revenue:{team_id}")
}

pub fn yearly_breakup(team_id: i32) -> String {
    format!("yearly_breakup:{team_id}")
}

pub fn monthly_earnings(team_id: i32) -> String {
    format!("monthly_earnings:{team_id}")
}

// == Patterns ==
/// Glob patterns matching every paginated variant of a listing.
pub mod patterns {
    /// All customer pages of a team, any page and page size.
    pub fn customers(team_id: i32) -> String {
        format!("customers:{team_id}:*:*")
    }

    /// All staff pages of a team.
    pub fn staff(team_id: i32) -> String {
        format!("staff:{team_id}:*:*")
    }

    /// All booking pages.
    pub fn bookings() -> String {
        "bookings:*:*".to_string()
    }
}
