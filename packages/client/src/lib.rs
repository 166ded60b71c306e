//! # Confdeck store client
//!
//! The remote configuration store as the rest of the system sees it: the
//! [`ConfigStore`] contract plus the HTTP implementation that owns every
//! transport concern (retries, request pacing, timeouts).

pub mod error;
pub mod http;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use http::HttpConfigStore;
pub use store::ConfigStore;
