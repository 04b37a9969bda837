//! Business error types for xkit services
//!
//! This crate provides plain error values with no dependencies on HTTP
//! frameworks. [`CodeMsg`] pairs a business code with a message and can be
//! returned from handlers like any other error; the response helpers in
//! `xkit-http` recognize it and copy both fields into the response envelope.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod code_msg;

pub use code_msg::{CodeMsg, new};
