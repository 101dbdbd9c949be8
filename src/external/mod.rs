//! HTTP plumbing shared by the vendor clients.

pub mod client;

pub use client::{HTTP_CLIENT, ensure_success};
