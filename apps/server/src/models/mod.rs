//! Domain and wire models

pub mod envelope;
pub mod operations;
pub mod requests;

pub use envelope::{CompanyProfile, Envelope, Status};
pub use operations::Operation;
