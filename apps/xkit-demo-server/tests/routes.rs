#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt; // for `oneshot`
use xkit_demo_server::router;

async fn get(uri: &str) -> (StatusCode, String, String) {
    let response = router()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("x-request-id", "req-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn json_routes_answer_the_documented_bodies() {
    let cases = [
        ("/json/code-msg", r#"{"code":1,"msg":"dummy error"}"#),
        ("/json/status", r#"{"code":0,"msg":"ok"}"#),
        ("/json/error", r#"{"code":-1,"msg":"dummy error"}"#),
        (
            "/json/struct",
            r#"{"code":0,"msg":"ok","data":{"name":"anyone"}}"#,
        ),
    ];

    for (uri, want) in cases {
        let (status, content_type, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(content_type, "application/json", "{uri}");
        assert_eq!(body, want, "{uri}");
    }
}

#[tokio::test]
async fn xml_routes_answer_the_documented_bodies() {
    let cases = [
        (
            "/xml/code-msg",
            r#"<xml version="1.0" encoding="UTF-8"><code>1</code><msg>dummy error</msg></xml>"#,
        ),
        (
            "/xml/status",
            r#"<xml version="1.0" encoding="UTF-8"><code>0</code><msg>ok</msg></xml>"#,
        ),
        (
            "/xml/error",
            r#"<xml version="1.0" encoding="UTF-8"><code>-1</code><msg>dummy error</msg></xml>"#,
        ),
        (
            "/xml/struct",
            r#"<xml version="1.0" encoding="UTF-8"><code>0</code><msg>ok</msg><data><name>anyone</name></data></xml>"#,
        ),
        ("/xml/raw", "<data><name>anyone</name></data>"),
    ];

    for (uri, want) in cases {
        let (status, content_type, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(content_type, "application/xml", "{uri}");
        assert_eq!(body, want, "{uri}");
    }
}

#[tokio::test]
async fn user_lookup_envelopes_handler_result() {
    let (status, _, body) = get("/json/users/anyone").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"code":0,"msg":"ok","data":{"name":"anyone"}}"#);

    let (status, _, body) = get("/json/users/nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"code":1001,"msg":"user nobody not found"}"#);
}

#[tokio::test]
async fn html_route_is_verbatim() {
    let (status, content_type, body) = get("/html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, "<html><body><p>anyone</p></body></html>");
}
