//! API client module for communicating with the analysis backend.

mod client;

pub use client::ApiClient;
