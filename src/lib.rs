//! A small static file server for local development of browser apps that
//! load binary assets (glTF models, wasm modules) from another origin.
//!
//! The crate exposes a hyper [`Service`](hyper::service::Service) that
//! resolves requests below a root directory, streams file bodies, maps a
//! fixed table of asset extensions to their content types, and stamps
//! permissive CORS headers on every response. The `asset-serve` binary
//! wraps it with a CLI, a startup banner and Ctrl+C shutdown.

pub mod body;
pub mod config;
pub mod cors;
pub mod error;
pub mod file;
pub mod mime;
pub mod range;
pub mod resolve;
pub mod respond;
pub mod server;
pub mod service;

pub use config::ServeConfig;
pub use error::ServeError;
pub use service::{AssetService, AssetServiceMaker};
