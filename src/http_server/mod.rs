//! # HTTP Server Module
//!
//! Axum server exposing the datapoint resource.
//!
//! # Endpoints
//!
//! - `/v1/status` - Liveness check
//! - `/v1/datapoint` (also with a trailing slash) - List (admin) and create (admin)
//! - `/v1/datapoint/{datapointId}` - Get, replace, update, delete (user)

pub mod auth;
pub mod config;
pub mod datapoint_routes;
pub mod server;
pub mod status_routes;

pub use config::HttpServerConfig;
pub use datapoint_routes::{datapoint_routes, DatapointState};
pub use server::HttpServer;
