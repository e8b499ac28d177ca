use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::header::{Header, HeaderList};
use crate::http::request::Request;

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The socket failed or closed before a request line arrived.
    Io,
    LineTooLong,
    InvalidRequest,
    InvalidHeader,
    /// The header block was empty.
    MissingHeaders,
}

/// Method, URI and query split out of the first request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    pub query: String,
}

/// Reads one request off `reader`: the request line, then headers up to the
/// blank line.
///
/// Reading stops at the end of the header block; anything after it is left
/// unread. Headers are line-oriented with no folding support.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?.ok_or(ParseError::Io)?;
    let line = std::str::from_utf8(&line).map_err(|_| ParseError::InvalidRequest)?;
    let RequestLine { method, uri, query } = parse_request_line(line)?;

    let mut headers = HeaderList::new();
    // A line of two bytes or fewer is the "\r\n" terminator; EOF also ends the block.
    while let Some(line) = read_line(reader).await? {
        if line.len() <= 2 {
            break;
        }
        let line = std::str::from_utf8(&line).map_err(|_| ParseError::InvalidHeader)?;
        headers.push(parse_header_line(line)?);
    }

    if headers.is_empty() {
        return Err(ParseError::MissingHeaders);
    }

    Ok(Request {
        method,
        uri,
        query,
        headers,
        path: None,
    })
}

/// Splits `METHOD SP URI[?QUERY] [SP VERSION]`.
///
/// The version token is optional; only method and target are required.
pub fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;

    let (uri, query) = target.split_once('?').unwrap_or((target, ""));

    Ok(RequestLine {
        method: method.to_string(),
        uri: uri.to_string(),
        query: query.to_string(),
    })
}

/// Splits `Name: value` at the first colon.
///
/// Leading whitespace of the value is skipped and the value ends at the
/// first CR or LF.
pub fn parse_header_line(line: &str) -> Result<Header, ParseError> {
    let (name, rest) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
    if name.is_empty() {
        return Err(ParseError::InvalidHeader);
    }

    let value = rest
        .trim_start()
        .split(['\r', '\n'])
        .next()
        .unwrap_or("");

    Ok(Header::new(name, value))
}

/// Reads through the next `\n`; `None` at EOF.
async fn read_line<R>(reader: &mut R) -> Result<Option<Vec<u8>>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', &mut line)
        .await
        .map_err(|_| ParseError::Io)?;

    if n == 0 {
        return Ok(None);
    }
    if n == MAX_LINE_LEN && !line.ends_with(b"\n") {
        return Err(ParseError::LineTooLong);
    }

    Ok(Some(line))
}
