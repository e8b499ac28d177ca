use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::connection::Connection;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Writes a status line and a minimal HTML page naming `status`.
///
/// Returns `status` even if the client has gone away.
pub async fn handle_error<S>(conn: &mut Connection<S>, status: StatusCode) -> StatusCode
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = Response::error_page(status);
    let mut writer = ResponseWriter::new(&response);
    if let Err(e) = writer.write_to_stream(conn.stream()).await {
        tracing::debug!(peer = %conn.peer, error = %e, "Failed to write error page");
    }
    status
}
