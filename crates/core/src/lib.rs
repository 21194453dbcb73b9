//! Domain types and pure business rules for the Geotoy order backend.
//!
//! Everything here is I/O-free: status tables, monetary parsing and
//! formatting, and the notification composer. Persistence lives in
//! `geotoy-db`, transports in `geotoy-extractor` / `geotoy-mailer`.

pub mod error;
pub mod money;
pub mod notification;
pub mod status;
pub mod types;
