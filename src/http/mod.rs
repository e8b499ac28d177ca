//! HTTP/1.0 protocol layer.
//!
//! Submodules:
//!
//! - **`connection`**: the accepted client socket with its peer address
//! - **`parser`**: reads the request line and header block off a connection
//! - **`header`**: the ordered header list attached to a request
//! - **`request`**: the parsed request handed to the handlers
//! - **`response`**: status codes and buffered responses
//! - **`writer`**: serializes response heads and bodies onto the wire
//! - **`mime`**: extension to mimetype lookup from a `mime.types` table
//!
//! # Request lifecycle
//!
//! Each connection carries exactly one request:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Accept    │ ← peer host/port recorded
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Parse     │ ← request line, then headers
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Resolve    │ ← URI confined to the document root
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Classify   │ ← browse / file / cgi / bad
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Dispatch   │ ← one complete response written
//!        └──────┬──────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod header;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
