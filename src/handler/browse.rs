use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::handler::Outcome;
use crate::http::connection::Connection;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Lists the directory at `dir` as an HTML list of links, sorted by name.
///
/// Entry names and the `Host` value go into the page unescaped.
pub async fn handle_browse<S>(conn: &mut Connection<S>, request: &Request, dir: &Path) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let names = match list_entries(dir).await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "Failed to scan directory");
            return Outcome::Failed(StatusCode::NotFound);
        }
    };

    let page = render_listing(request.host(), &request.uri, &names);
    let mut writer = ResponseWriter::new(&Response::html(page));
    match writer.write_to_stream(conn.stream()).await {
        Ok(()) => Outcome::Sent(StatusCode::Ok),
        Err(e) => {
            tracing::warn!(peer = %conn.peer, error = %e, "Failed to write directory listing");
            Outcome::Sent(StatusCode::InternalServerError)
        }
    }
}

/// Entry names of `dir` in byte order.
pub async fn list_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

pub fn render_listing(host: &str, uri: &str, names: &[String]) -> String {
    let mut page = String::from("<html>\n<ul>\n");
    for name in names {
        page.push_str(&format!(
            "<li><a href=\"http://{}\">{}</a></li>\n",
            entry_link(host, uri, name),
            name
        ));
    }
    page.push_str("</ul>\n</html>\n");
    page
}

/// `host + uri + "/" + name`, without doubling a trailing slash.
pub fn entry_link(host: &str, uri: &str, name: &str) -> String {
    if uri.ends_with('/') {
        format!("{host}{uri}{name}")
    } else {
        format!("{host}{uri}/{name}")
    }
}
