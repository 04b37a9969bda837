//! Axum integration: envelopes and buffered responses as handler return values

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::base::{BaseResponse, XmlBaseResponse};
use crate::responses::{ok_json, ok_xml};
use crate::sink::BufferedResponse;

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let (parts, body) = self.into_http().into_parts();
        Response::from_parts(parts, Body::from(body))
    }
}

/// `200 OK` with the JSON envelope.
impl<T: Serialize> IntoResponse for BaseResponse<T> {
    fn into_response(self) -> Response {
        let mut w = BufferedResponse::new();
        ok_json(&mut w, &self);
        w.into_response()
    }
}

/// `200 OK` with the XML envelope.
impl<T: Serialize> IntoResponse for XmlBaseResponse<T> {
    fn into_response(self) -> Response {
        let mut w = BufferedResponse::new();
        ok_xml(&mut w, &self);
        w.into_response()
    }
}
