use spire::http::header::{Header, HeaderList};
use spire::http::request::RequestBuilder;

#[test]
fn test_header_list_iterates_newest_first() {
    let mut headers = HeaderList::new();
    headers.push(Header::new("Host", "example.com"));
    headers.push(Header::new("Accept", "*/*"));
    headers.push(Header::new("Connection", "close"));

    let names: Vec<&str> = headers.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Connection", "Accept", "Host"]);
    assert_eq!(headers.len(), 3);
}

#[test]
fn test_header_list_get_case_insensitive() {
    let mut headers = HeaderList::new();
    headers.push(Header::new("Content-Type", "text/html"));

    assert_eq!(headers.get("content-type"), Some("text/html"));
    assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
    assert_eq!(headers.get("Missing"), None);
}

#[test]
fn test_header_list_get_repeated_header_settles_on_first_sent() {
    let mut headers = HeaderList::new();
    headers.push(Header::new("Host", "first.example"));
    headers.push(Header::new("Host", "second.example"));

    assert_eq!(headers.get("Host"), Some("first.example"));
}

#[test]
fn test_header_list_empty() {
    let headers = HeaderList::new();

    assert!(headers.is_empty());
    assert_eq!(headers.iter().count(), 0);
}

#[test]
fn test_request_builder() {
    let req = RequestBuilder::new()
        .method("GET")
        .uri("/docs")
        .query("page=2")
        .header("Host", "localhost:9898")
        .build()
        .unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.uri, "/docs");
    assert_eq!(req.query, "page=2");
    assert_eq!(req.host(), "localhost:9898");
    assert!(req.path.is_none());
}

#[test]
fn test_request_builder_requires_a_header() {
    let result = RequestBuilder::new().method("GET").uri("/").build();

    assert!(result.is_err());
}

#[test]
fn test_request_host_missing_is_empty() {
    let req = RequestBuilder::new()
        .method("GET")
        .uri("/")
        .header("Accept", "*/*")
        .build()
        .unwrap();

    assert_eq!(req.host(), "");
}
