//! Spire - minimal HTTP/1.0 origin server
//!
//! Serves directory listings, static files and CGI scripts from a sandboxed
//! document root, one request per connection.

pub mod config;
pub mod docroot;
pub mod handler;
pub mod http;
pub mod server;
