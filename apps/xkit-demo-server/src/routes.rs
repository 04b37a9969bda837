//! Example routes: every kind of handler outcome, as JSON and as XML.

use axum::Router;
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tonic::{Code, Status};
use tower_http::trace::TraceLayer;
use xkit_errors::CodeMsg;
use xkit_http::{
    BaseResponse, BoxError, BufferedResponse, Payload, RequestContext, XmlBaseResponse,
    json_base_response_ctx, ok_html_ctx, ok_xml_ctx, wrap_base_response, wrap_xml_base_response,
};

/// Business code answered for unknown users.
pub const CODE_USER_NOT_FOUND: i32 = 1001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "data")]
pub struct Message {
    pub name: String,
}

fn anyone() -> Message {
    Message {
        name: "anyone".to_owned(),
    }
}

fn dummy_error() -> BoxError {
    "dummy error".into()
}

#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/json/code-msg", get(json_code_msg))
        .route("/json/status", get(json_status))
        .route("/json/error", get(json_error))
        .route("/json/struct", get(json_struct))
        .route("/json/users/{name}", get(json_user))
        .route("/xml/code-msg", get(xml_code_msg))
        .route("/xml/status", get(xml_status))
        .route("/xml/error", get(xml_error))
        .route("/xml/struct", get(xml_struct))
        .route("/xml/raw", get(xml_raw))
        .route("/html", get(html))
        .layer(TraceLayer::new_for_http())
}

async fn json_code_msg() -> BaseResponse<()> {
    wrap_base_response(CodeMsg::new(1, "dummy error"))
}

async fn json_status() -> BaseResponse<()> {
    wrap_base_response(Status::new(Code::Ok, "ok"))
}

async fn json_error() -> BaseResponse<()> {
    wrap_base_response(dummy_error())
}

async fn json_struct(headers: HeaderMap) -> BufferedResponse {
    let ctx = RequestContext::from_headers(&headers);
    let mut w = BufferedResponse::new();
    json_base_response_ctx(&ctx, &mut w, Payload(anyone()));
    w
}

async fn json_user(Path(name): Path<String>) -> BaseResponse<Message> {
    wrap_base_response(find_user(&name))
}

fn find_user(name: &str) -> Result<Message, CodeMsg> {
    if name == "anyone" {
        Ok(anyone())
    } else {
        tracing::debug!(user = name, "user lookup missed");
        Err(CodeMsg::new(CODE_USER_NOT_FOUND, format!("user {name} not found")))
    }
}

async fn xml_code_msg() -> XmlBaseResponse<()> {
    wrap_xml_base_response(CodeMsg::new(1, "dummy error"))
}

async fn xml_status() -> XmlBaseResponse<()> {
    wrap_xml_base_response(Status::new(Code::Ok, "ok"))
}

async fn xml_error() -> XmlBaseResponse<()> {
    wrap_xml_base_response(dummy_error())
}

async fn xml_struct() -> XmlBaseResponse<Message> {
    wrap_xml_base_response(Payload(anyone()))
}

async fn xml_raw(headers: HeaderMap) -> BufferedResponse {
    let ctx = RequestContext::from_headers(&headers);
    let mut w = BufferedResponse::new();
    ok_xml_ctx(&ctx, &mut w, &anyone());
    w
}

async fn html(headers: HeaderMap) -> BufferedResponse {
    let ctx = RequestContext::from_headers(&headers);
    let mut w = BufferedResponse::new();
    ok_html_ctx(&ctx, &mut w, "<html><body><p>anyone</p></body></html>");
    w
}
