//! Output sink abstraction targeted by the writers

use http::{HeaderMap, Response, StatusCode};

use crate::error::SinkError;

/// Destination of a single HTTP response.
///
/// The shape follows the classic server-side response writer: a mutable
/// header map, a one-shot status commit and a byte writer. A sink is owned
/// by one request for the duration of a write, so no method takes a lock.
pub trait ResponseWriter {
    /// Headers that will be sent with the status line.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commit the status line. Implementations must ignore every call after
    /// the first one.
    fn write_header(&mut self, status: StatusCode);

    /// Write body bytes and return how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::HandlerTimeout`] when the request already timed
    /// out, or [`SinkError::Io`] on any other transport failure.
    fn write(&mut self, buf: &[u8]) -> Result<usize, SinkError>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, SinkError> {
        (**self).write(buf)
    }
}

/// In-memory sink that records the response and can be turned into an
/// [`http::Response`].
///
/// Writing body bytes before a status was committed commits `200 OK`.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    headers: HeaderMap,
    status: Option<StatusCode>,
    body: Vec<u8>,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed status, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert into an [`http::Response`]; an uncommitted status becomes `200 OK`.
    #[must_use]
    pub fn into_http(self) -> Response<Vec<u8>> {
        let mut resp = Response::new(self.body);
        *resp.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *resp.headers_mut() = self.headers;
        resp
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, SinkError> {
        self.write_header(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use http::HeaderValue;

    #[test]
    fn first_status_wins() {
        let mut w = BufferedResponse::new();
        w.write_header(StatusCode::CREATED);
        w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(w.status(), Some(StatusCode::CREATED));
    }

    #[test]
    fn body_write_commits_ok() {
        let mut w = BufferedResponse::new();
        assert_eq!(w.write(b"hello").unwrap(), 5);
        w.write_header(StatusCode::NOT_FOUND);
        assert_eq!(w.status(), Some(StatusCode::OK));
        assert_eq!(w.body(), b"hello");
    }

    #[test]
    fn into_http_keeps_headers_status_and_body() {
        let mut w = BufferedResponse::new();
        w.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        w.write_header(StatusCode::ACCEPTED);
        w.write(b"<p>hi</p>").unwrap();

        let resp = w.into_http();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(resp.body().as_slice(), b"<p>hi</p>");
    }

    #[test]
    fn uncommitted_response_defaults_to_ok() {
        let resp = BufferedResponse::new().into_http();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.body().is_empty());
    }
}
