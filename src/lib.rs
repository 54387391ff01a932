//! Spidey - a minimal HTTP/1.0 server
//!
//! Core library for request parsing, path resolution and the directory,
//! static file and CGI response strategies.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
