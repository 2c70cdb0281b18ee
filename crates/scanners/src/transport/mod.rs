//! Shared HTTP transport.
//!
//! All plugin traffic goes through one `Transport` instance. It bounds the
//! number of in-flight requests with a semaphore, retries connection-level
//! failures with exponential backoff, and inserts a minimum delay after every
//! completed request while still holding the concurrency permit - so the
//! effective request rate is capped at `max_concurrent_requests`
//! per `delay_between_requests`, not just the raw concurrency.

pub mod http;
pub mod url;

pub use http::{HttpResponse, RequestBody, RequestOptions, Transport, TransportError};
pub use reqwest::Method;
pub use url::{base_url, is_valid_url, join_url};
