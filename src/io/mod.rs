pub mod client;
pub mod models;

pub use client::{IoServiceClient, DEFAULT_BASE_URL};
