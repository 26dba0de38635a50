//! TTL classes
//!
//! Named lifetimes chosen per data volatility. The backing store enforces
//! expiry; these values are only passed at write time.

// == Ttl ==
/// Lifetime class of a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ttl {
    /// Frequently changing data (1 minute)
    Short,
    /// Semi-static data (5 minutes)
    Medium,
    /// Rarely changing data (1 hour)
    Long,
    /// User session data (30 minutes)
    UserSession,
    /// Explicit number of seconds
    Seconds(u64),
}

impl Ttl {
    pub const SHORT_SECS: u64 = 60;
    pub const MEDIUM_SECS: u64 = 300;
    pub const LONG_SECS: u64 = 3600;
    pub const USER_SESSION_SECS: u64 = 1800;

    /// Lifetime in whole seconds.
    pub fn as_secs(self) -> u64 {
        match self {
            Ttl::Short => Self::SHORT_SECS,
            Ttl::Medium => Self::MEDIUM_SECS,
            Ttl::Long => Self::LONG_SECS,
            Ttl::UserSession => Self::USER_SESSION_SECS,
            Ttl::Seconds(secs) => secs,
        }
    }
}
