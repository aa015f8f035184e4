//! Threadprint
//!
//! HTTP service and CLI turning photos into paint-by-number and embroidery
//! blueprints. The algorithms live in the `blueprint-engine` crate; this
//! library exposes the server modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
