//! Clients for services outside this process.

pub mod client;

pub use client::{ReqwestTransport, build_http_client};
