//! Request handlers.
//!
//! [`handle_request`] drives one connection from parsing to a written
//! response. Each handler reports an [`Outcome`]: either it wrote a
//! response (possibly cut short) with some status, or it failed before
//! writing anything and the error page for that status is sent instead.

pub mod browse;
pub mod cgi;
pub mod error;
pub mod file;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::docroot::{self, RequestType};
use crate::http::connection::Connection;
use crate::http::parser;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::server::ServerContext;

/// Fixed chunk size for streaming file and CGI output.
pub const BUFFER_SIZE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A response head went out; this is the status the client saw.
    Sent(StatusCode),
    /// Nothing was written yet.
    Failed(StatusCode),
}

/// Parses, resolves, classifies and answers the single request on `conn`.
///
/// Always writes one response and logs the method/URI/status triple, even
/// when the request could not be parsed.
pub async fn handle_request<S>(conn: &mut Connection<S>, ctx: &ServerContext) -> StatusCode
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut request = match parser::read_request(conn.stream()).await {
        Ok(request) => request,
        Err(e) => {
            warn!(peer = %conn.peer, error = ?e, "Failed to parse request");
            let status = error::handle_error(conn, StatusCode::BadRequest).await;
            info!(method = "-", uri = "-", status = status.as_u16(), "Request handled");
            return status;
        }
    };

    debug!(
        method = %request.method,
        uri = %request.uri,
        query = %request.query,
        headers = request.headers.len(),
        "Parsed request"
    );
    for header in &request.headers {
        debug!(name = %header.name, value = %header.value, "Request header");
    }

    request.path = docroot::resolve(&ctx.config.documents.root, &request.uri).await;

    let status = dispatch(conn, &request, ctx).await;

    info!(
        method = %request.method,
        uri = %request.uri,
        status = status.as_u16(),
        "Request handled"
    );
    status
}

/// Routes a parsed request to its handler and settles the final status.
pub async fn dispatch<S>(conn: &mut Connection<S>, request: &Request, ctx: &ServerContext) -> StatusCode
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let kind = match &request.path {
        Some(path) => docroot::classify(path).await,
        None => RequestType::Bad,
    };
    debug!(path = ?request.path, kind = ?kind, "Classified request");

    let outcome = match (kind, request.path.as_deref()) {
        (RequestType::Browse, Some(path)) => browse::handle_browse(conn, request, path).await,
        (RequestType::File, Some(path)) => file::handle_file(conn, path, &ctx.mime_types).await,
        (RequestType::Cgi, Some(path)) => cgi::handle_cgi(conn, request, path, &ctx.config).await,
        _ => Outcome::Failed(StatusCode::NotFound),
    };

    match outcome {
        Outcome::Sent(status) => status,
        Outcome::Failed(status) => error::handle_error(conn, status).await,
    }
}
