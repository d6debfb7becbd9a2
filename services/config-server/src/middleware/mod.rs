//! Middleware module for the config server

pub mod auth;
pub mod rate_limit;

// Re-export commonly used items
pub use auth::auth_middleware;
pub use rate_limit::RateLimiter;
