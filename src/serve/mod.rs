// src/serve/mod.rs

//! Static HTTP server for the generated artifact.
//!
//! Built on `axum` with `tower-http`'s `ServeDir`. The server shares nothing
//! with the watcher; it reads whatever is on disk at request time.

pub mod server;

pub use server::{bind, router, BoundServer, ServerConfig};
