//! HTTP surface of the Geotoy order backend.
//!
//! Exposed as a library so integration tests can build the exact router and
//! middleware stack the production binary uses.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
