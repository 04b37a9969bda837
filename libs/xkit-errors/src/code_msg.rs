//! Business error carrying an application code and message

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A business error made of an application-defined code and a message.
///
/// The code is a business code, not an HTTP status: a handler may answer
/// `200 OK` with a body whose `code` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("code: {code}, msg: {msg}")]
#[must_use]
pub struct CodeMsg {
    pub code: i32,
    pub msg: String,
}

impl CodeMsg {
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }
}

/// Create a [`CodeMsg`] already boxed as a generic error.
///
/// Use this when the value has to flow through code that only deals in
/// `Box<dyn Error>`; the concrete type can be recovered with `downcast_ref`.
#[must_use]
pub fn new(code: i32, msg: impl Into<String>) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(CodeMsg::new(code, msg))
}
