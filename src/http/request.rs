use std::path::PathBuf;

use crate::http::header::{Header, HeaderList};

/// A fully parsed HTTP request.
///
/// Only the parser produces one, and only when the request line and at
/// least one header were read successfully, so every field but `path` is
/// always populated.
#[derive(Debug, Clone)]
pub struct Request {
    /// Method token as sent (e.g. "GET"), not validated.
    pub method: String,
    /// Path component of the request target, before any `?`.
    pub uri: String,
    /// Everything after the first `?`; empty when there is none.
    pub query: String,
    pub headers: HeaderList,
    /// Canonical filesystem path inside the document root, or `None` if the
    /// URI failed to resolve or escaped the root.
    pub path: Option<PathBuf>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// `Host` header value, or empty when the client sent none.
    pub fn host(&self) -> &str {
        self.header("Host").unwrap_or("")
    }
}

/// Builder for constructing Request objects outside the parser.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<String>,
    uri: Option<String>,
    query: String,
    headers: HeaderList,
    path: Option<PathBuf>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Appends a header as if it were the next line on the wire.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        if self.headers.is_empty() {
            return Err("at least one header is required");
        }
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            uri: self.uri.ok_or("uri missing")?,
            query: self.query,
            headers: self.headers,
            path: self.path,
        })
    }
}
