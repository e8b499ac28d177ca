use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;

use crate::config::Config;
use crate::handler::{BUFFER_SIZE, Outcome};
use crate::http::connection::{Connection, Peer};
use crate::http::request::Request;
use crate::http::response::StatusCode;

/// Request headers exported to scripts, with their variable names.
pub const FORWARDED_HEADERS: [(&str, &str); 6] = [
    ("Accept", "HTTP_ACCEPT"),
    ("Host", "HTTP_HOST"),
    ("Accept-Language", "HTTP_ACCEPT_LANGUAGE"),
    ("Accept-Encoding", "HTTP_ACCEPT_ENCODING"),
    ("Connection", "HTTP_CONNECTION"),
    ("User-Agent", "HTTP_USER_AGENT"),
];

/// Variables a script receives on top of the server's own environment.
///
/// Header-derived variables are only present when the header was sent.
/// Headers are walked newest-first and later matches overwrite earlier ones.
pub fn cgi_environment(
    request: &Request,
    peer: &Peer,
    script: &Path,
    cfg: &Config,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
        "DOCUMENT_ROOT".to_string(),
        cfg.documents.root.to_string_lossy().into_owned(),
    );
    env.insert("QUERY_STRING".to_string(), request.query.clone());
    env.insert("REMOTE_ADDR".to_string(), peer.host.clone());
    env.insert("REMOTE_PORT".to_string(), peer.port.clone());
    env.insert("REQUEST_METHOD".to_string(), request.method.clone());
    env.insert("REQUEST_URI".to_string(), request.uri.clone());
    env.insert(
        "SCRIPT_FILENAME".to_string(),
        script.to_string_lossy().into_owned(),
    );
    env.insert("SERVER_PORT".to_string(), cfg.server.port.to_string());

    for header in &request.headers {
        if let Some((_, var)) = FORWARDED_HEADERS.iter().find(|(name, _)| header.is(name)) {
            env.insert(var.to_string(), header.value.clone());
        }
    }

    env
}

/// Runs `script` directly (no shell) and relays its stdout verbatim.
///
/// The script is expected to write its own status line and headers. A
/// script that cannot be started is a 500; the child is always reaped
/// before returning.
pub async fn handle_cgi<S>(
    conn: &mut Connection<S>,
    request: &Request,
    script: &Path,
    cfg: &Config,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let env = cgi_environment(request, &conn.peer, script, cfg);

    let mut child = match Command::new(script)
        .envs(&env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(script = %script.display(), error = %e, "Failed to launch CGI script");
            return Outcome::Failed(StatusCode::InternalServerError);
        }
    };

    let Some(mut output) = child.stdout.take() else {
        let _ = child.kill().await;
        return Outcome::Failed(StatusCode::InternalServerError);
    };

    let stream = conn.stream();
    let mut status = StatusCode::Ok;
    match relay_output(&mut output, stream).await {
        Ok(()) => {}
        Err(RelayError::Read(e)) => {
            tracing::warn!(script = %script.display(), error = %e, "Failed reading CGI output");
            status = StatusCode::InternalServerError;
        }
        Err(RelayError::Write(e)) => {
            tracing::warn!(script = %script.display(), error = %e, "Client write failed while relaying CGI output");
            status = StatusCode::InternalServerError;
            let _ = child.start_kill();
        }
    }
    drop(output);

    match child.wait().await {
        Ok(exit) if !exit.success() => {
            tracing::warn!(script = %script.display(), exit = %exit, "CGI script exited unsuccessfully");
        }
        Ok(exit) => tracing::debug!(script = %script.display(), exit = %exit, "CGI script finished"),
        Err(e) => tracing::warn!(script = %script.display(), error = %e, "Failed to reap CGI script"),
    }

    if stream.flush().await.is_err() {
        status = StatusCode::InternalServerError;
    }
    Outcome::Sent(status)
}

/// Which side of the relay broke.
#[derive(Debug)]
pub enum RelayError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Copies `output` to `stream` in fixed-size chunks until EOF.
pub async fn relay_output<R, W>(output: &mut R, stream: &mut W) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        buffer.clear();
        let n = output.read_buf(&mut buffer).await.map_err(RelayError::Read)?;
        if n == 0 {
            return Ok(());
        }
        stream.write_all(&buffer).await.map_err(RelayError::Write)?;
    }
}
