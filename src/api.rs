//! REST data source.

mod client;
mod envelope;
mod error;

pub use client::ApiClient;
pub use envelope::{Envelope, RecordEnvelope};
pub use error::ApiError;
