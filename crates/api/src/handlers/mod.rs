//! Request handlers.

pub mod orders;
