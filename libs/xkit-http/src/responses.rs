//! JSON, XML and HTML response writers
//!
//! Every format comes in three layers:
//! - `try_write_*` does the work and returns the failure;
//! - `write_*_ctx` reports a failure through the given [`ErrorReporter`];
//! - `write_*` reports through [`GlobalReporter`].
//!
//! `ok_*` variants fix the status to `200 OK`. None of these functions wrap
//! the value in a [`BaseResponse`](crate::BaseResponse); see [`crate::base`] for that.

use http::header::{CONTENT_LENGTH, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderValue, StatusCode};
use serde::Serialize;

use crate::context::{ErrorReporter, GlobalReporter};
use crate::error::{SinkError, WriteError};
use crate::sink::ResponseWriter;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "application/xml";
pub const HTML_CONTENT_TYPE: &str = "text/html";
const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Write `v` as JSON with `200 OK`.
pub fn ok_json<W, T>(w: &mut W, v: &T)
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_json(w, StatusCode::OK, v);
}

/// Write `v` as JSON with `200 OK`, reporting failures through `reporter`.
pub fn ok_json_ctx<R, W, T>(reporter: &R, w: &mut W, v: &T)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_json_ctx(reporter, w, StatusCode::OK, v);
}

pub fn write_json<W, T>(w: &mut W, status: StatusCode, v: &T)
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_json_ctx(&GlobalReporter, w, status, v);
}

pub fn write_json_ctx<R, W, T>(reporter: &R, w: &mut W, status: StatusCode, v: &T)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    if let Err(err) = try_write_json(w, status, v) {
        reporter.report(&err);
    }
}

/// Encode `v` as JSON and write it with `status`.
///
/// # Errors
///
/// Returns [`WriteError::MarshalJson`] after answering `500` when `v` cannot
/// be encoded, [`WriteError::Write`] when the sink fails (except on handler
/// timeout), and [`WriteError::ShortWrite`] when the sink takes fewer bytes
/// than the body holds.
pub fn try_write_json<W, T>(w: &mut W, status: StatusCode, v: &T) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    let body = match serde_json::to_vec(v) {
        Ok(body) => body,
        Err(e) => {
            write_plain_error(w, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
            return Err(WriteError::MarshalJson(e));
        }
    };

    write_body(w, status, JSON_CONTENT_TYPE, &body)
}

/// Write `v` as XML with `200 OK`.
pub fn ok_xml<W, T>(w: &mut W, v: &T)
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_xml(w, StatusCode::OK, v);
}

/// Write `v` as XML with `200 OK`, reporting failures through `reporter`.
pub fn ok_xml_ctx<R, W, T>(reporter: &R, w: &mut W, v: &T)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_xml_ctx(reporter, w, StatusCode::OK, v);
}

pub fn write_xml<W, T>(w: &mut W, status: StatusCode, v: &T)
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_xml_ctx(&GlobalReporter, w, status, v);
}

pub fn write_xml_ctx<R, W, T>(reporter: &R, w: &mut W, status: StatusCode, v: &T)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    if let Err(err) = try_write_xml(w, status, v) {
        reporter.report(&err);
    }
}

/// Encode `v` as XML and write it with `status`.
///
/// The root element is named after the serde name of `v`'s type, so use
/// `#[serde(rename = "...")]` on the type to choose it. Empty elements are
/// written in full (`<msg></msg>`).
///
/// Values without a type name (strings, numbers, sequences, maps) have no
/// root element and fail to encode; wrap them in a named struct.
///
/// # Errors
///
/// Same contract as [`try_write_json`], with [`WriteError::MarshalXml`] for
/// encoding failures, including a top-level value without a type name.
pub fn try_write_xml<W, T>(w: &mut W, status: StatusCode, v: &T) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    let body = match to_xml(v) {
        Ok(body) => body,
        Err(e) => {
            write_plain_error(w, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
            return Err(WriteError::MarshalXml(e));
        }
    };

    write_body(w, status, XML_CONTENT_TYPE, body.as_bytes())
}

fn to_xml<T: Serialize + ?Sized>(v: &T) -> Result<String, quick_xml::SeError> {
    let mut body = String::new();
    let mut ser = quick_xml::se::Serializer::new(&mut body);
    ser.expand_empty_elements(true);
    v.serialize(ser)?;
    Ok(body)
}

/// Write `text` as HTML with `200 OK`.
pub fn ok_html<W>(w: &mut W, text: &str)
where
    W: ResponseWriter + ?Sized,
{
    write_html(w, StatusCode::OK, text);
}

/// Write `text` as HTML with `200 OK`, reporting failures through `reporter`.
pub fn ok_html_ctx<R, W>(reporter: &R, w: &mut W, text: &str)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
{
    write_html_ctx(reporter, w, StatusCode::OK, text);
}

pub fn write_html<W>(w: &mut W, status: StatusCode, text: &str)
where
    W: ResponseWriter + ?Sized,
{
    write_html_ctx(&GlobalReporter, w, status, text);
}

pub fn write_html_ctx<R, W>(reporter: &R, w: &mut W, status: StatusCode, text: &str)
where
    R: ErrorReporter + ?Sized,
    W: ResponseWriter + ?Sized,
{
    if let Err(err) = try_write_html(w, status, text) {
        reporter.report(&err);
    }
}

/// Write `text` verbatim as an HTML body with `status`.
///
/// # Errors
///
/// [`WriteError::Write`] or [`WriteError::ShortWrite`], as for [`try_write_json`].
pub fn try_write_html<W>(w: &mut W, status: StatusCode, text: &str) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
{
    write_body(w, status, HTML_CONTENT_TYPE, text.as_bytes())
}

fn write_body<W>(
    w: &mut W,
    status: StatusCode,
    content_type: &'static str,
    body: &[u8],
) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
{
    w.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    w.write_header(status);

    match w.write(body) {
        // The timeout layer has already answered the client.
        Err(SinkError::HandlerTimeout) => Ok(()),
        Err(e) => Err(WriteError::Write(e)),
        Ok(written) if written < body.len() => Err(WriteError::ShortWrite {
            expected: body.len(),
            written,
        }),
        Ok(_) => Ok(()),
    }
}

/// Plain-text error answer used when the value could not be encoded.
fn write_plain_error<W>(w: &mut W, status: StatusCode, msg: &str)
where
    W: ResponseWriter + ?Sized,
{
    let headers = w.headers_mut();
    headers.remove(CONTENT_LENGTH);
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(PLAIN_TEXT_CONTENT_TYPE),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    w.write_header(status);

    let body = format!("{msg}\n");
    if let Err(e) = w.write(body.as_bytes()) {
        tracing::debug!(error = %e, "failed to write error body");
    }
}
