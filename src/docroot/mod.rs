//! Mapping request URIs onto the document root.
//!
//! `resolver` confines a URI to the root; `classify` decides how the
//! resolved path is served.

pub mod classify;
pub mod resolver;

pub use classify::{RequestType, classify};
pub use resolver::resolve;
