pub mod client;
pub mod error;
pub mod types;

pub use client::{DriveClient, ACCESS_TOKEN_ENV};
pub use error::DriveApiError;
