//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod metrics;
pub mod redirect;
pub mod revoke;
pub mod shorten;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use redirect::redirect_handler;
pub use revoke::revoke_handler;
pub use shorten::shorten_handler;
