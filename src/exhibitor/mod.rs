//! Exhibitor search: HTTP client, retry policy, response models and flattening.

pub mod client;
pub mod error;
pub mod flatten;
pub mod models;
pub mod retry;

pub use client::{ExhibitorClient, ExhibitorSearch};
pub use error::FetchError;
pub use flatten::flatten;
pub use models::{Cell, FlatRecord, PageRequest};
pub use retry::RetryPolicy;
