use std::path::Path;

use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::handler::{BUFFER_SIZE, Outcome};
use crate::http::connection::Connection;
use crate::http::mime::MimeTable;
use crate::http::response::StatusCode;
use crate::http::writer;

/// Streams the file at `path` with a `200 OK` head.
///
/// An unopenable file is a 404. Once the head is out, a failed write aborts
/// the transfer and reports 500; the file is closed on every path.
pub async fn handle_file<S>(conn: &mut Connection<S>, path: &Path, mime_types: &MimeTable) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open file");
            return Outcome::Failed(StatusCode::NotFound);
        }
    };

    let mimetype = mime_types.lookup(path);
    tracing::debug!(path = %path.display(), mimetype, "Serving file");

    let stream = conn.stream();
    if writer::write_head(stream, StatusCode::Ok, mimetype).await.is_err() {
        return Outcome::Sent(StatusCode::InternalServerError);
    }

    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        buffer.clear();
        let n = match file.read_buf(&mut buffer).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed reading file");
                return Outcome::Sent(StatusCode::InternalServerError);
            }
        };
        if n == 0 {
            break;
        }
        if let Err(e) = stream.write_all(&buffer).await {
            tracing::warn!(path = %path.display(), error = %e, "Short write while streaming file");
            return Outcome::Sent(StatusCode::InternalServerError);
        }
    }

    match stream.flush().await {
        Ok(()) => Outcome::Sent(StatusCode::Ok),
        Err(_) => Outcome::Sent(StatusCode::InternalServerError),
    }
}
