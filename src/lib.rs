//! ChatWork build notifier
//!
//! Renders a message template for a finished CI build and posts it to a
//! ChatWork room. Delivery is best-effort and never fails the build.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod services;

pub use services::BuildNotifier;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
