//! Client layer: HTTP transport, retry policy, and the public
//! [`DeliveryClient`] surface.

pub mod delivery;
pub mod http;
pub mod retry;

pub use delivery::DeliveryClient;
pub use http::HttpTransport;
pub use retry::{retry_api, retry_with_backoff, BackoffParams};
