//! Response helpers for xkit services
//!
//! This crate extends a plain HTTP handler with:
//! - a uniform base response envelope `{code, msg, data}` and the rules that
//!   classify any handler outcome into it ([`base`]);
//! - JSON, XML and HTML writers with one failure policy ([`responses`]);
//! - the sink they write to ([`ResponseWriter`], [`BufferedResponse`]);
//! - explicit error reporting for failures that are logged rather than
//!   returned ([`ErrorReporter`], [`RequestContext`]).
//!
//! With the `axum` feature, envelopes and [`BufferedResponse`] can be
//! returned straight from axum handlers.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod base;
pub mod context;
pub mod error;
pub mod responses;
pub mod sink;

#[cfg(feature = "axum")]
mod axum_ext;

pub use base::{
    BUSINESS_CODE_ERROR, BUSINESS_CODE_OK, BUSINESS_MSG_OK, BaseResponse, BoxError,
    IntoBaseResponse, Payload, XmlBaseResponse, classify_error, json_base_response,
    json_base_response_ctx, wrap_base_response, wrap_xml_base_response, xml_base_response,
    xml_base_response_ctx,
};
pub use context::{ErrorReporter, GlobalReporter, RequestContext, extract_trace_id};
pub use error::{SinkError, WriteError};
pub use responses::{
    HTML_CONTENT_TYPE, JSON_CONTENT_TYPE, XML_CONTENT_TYPE, ok_html, ok_html_ctx, ok_json,
    ok_json_ctx, ok_xml, ok_xml_ctx, try_write_html, try_write_json, try_write_xml, write_html,
    write_html_ctx, write_json, write_json_ctx, write_xml, write_xml_ctx,
};
pub use sink::{BufferedResponse, ResponseWriter};
