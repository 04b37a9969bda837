//! Example server for the xkit response helpers.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod logging;
pub mod routes;

pub use config::AppConfig;
pub use routes::router;
