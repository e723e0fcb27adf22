pub mod client;
pub mod prompts;

pub use client::{extract_json, LlmOracle, API_KEY_ENV};
