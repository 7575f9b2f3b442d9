pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod recover;
pub mod request_id;
pub mod security_headers;
pub mod timeout;

pub use auth::require_auth;
pub use logging::log_requests;
pub use rate_limit::{rate_limit, RateLimiter};
pub use recover::recover;
pub use request_id::{request_id, RequestId, REQUEST_ID_HEADER};
pub use security_headers::security_headers;
pub use timeout::timeout;
