mod client;

pub use client::{AcuityClient, DEFAULT_BASE_URL};
