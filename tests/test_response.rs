use spire::http::response::{
    FALLBACK_STATUS_TEXT, Response, ResponseBuilder, StatusCode, status_text,
};
use spire::http::writer::{ResponseWriter, serialize_head, serialize_response};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_text_known_codes() {
    assert_eq!(status_text(200), "200 OK");
    assert_eq!(status_text(400), "400 Bad Request");
    assert_eq!(status_text(404), "404 Not Found");
    assert_eq!(status_text(500), "500 Internal Server Error");
}

#[test]
fn test_status_text_unknown_code_falls_back() {
    assert_eq!(status_text(418), FALLBACK_STATUS_TEXT);
    assert_eq!(status_text(0), FALLBACK_STATUS_TEXT);
    assert_eq!(StatusCode::from_u16(302), None);
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok).body(body.clone()).build();

    assert_eq!(response.header("Content-Length"), Some("16"));
}

#[test]
fn test_response_builder_replaces_header() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("content-type", "text/html")
        .build();

    assert_eq!(response.headers.len(), 2);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
}

#[test]
fn test_error_page_contains_status_text() {
    let response = Response::error_page(StatusCode::NotFound);

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    let body = String::from_utf8(response.body).unwrap();
    assert!(body.contains("404 Not Found"));
}

#[test]
fn test_serialize_head() {
    let head = serialize_head(StatusCode::Ok, "image/png");

    assert_eq!(head, b"HTTP/1.0 200 OK\r\nContent-Type: image/png\r\n\r\n".to_vec());
}

#[test]
fn test_serialize_response_keeps_header_order() {
    let response = Response::html("<ul></ul>");
    let bytes = serialize_response(&response);

    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "HTTP/1.0 200 OK\r\nContent-Type: text/html\r\nContent-Length: 9\r\n\r\n<ul></ul>"
    );
}

#[tokio::test]
async fn test_response_writer_writes_everything() {
    let response = Response::error_page(StatusCode::BadRequest);
    let expected = serialize_response(&response);

    let mut out: Vec<u8> = Vec::new();
    ResponseWriter::new(&response)
        .write_to_stream(&mut out)
        .await
        .unwrap();

    assert_eq!(out, expected);
    assert!(out.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));
}
