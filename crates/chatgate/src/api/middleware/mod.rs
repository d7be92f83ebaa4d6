//! Request hygiene middleware: origin restriction, rate limiting, hardening headers

mod origin;
mod rate_limit;
mod security;

pub use origin::{cors_layer, origin_allowed, origin_guard};
pub use rate_limit::{RateLimitDecision, RateLimiter, client_key, rate_limit_middleware};
pub use security::{SECURITY_HEADERS, security_headers};
