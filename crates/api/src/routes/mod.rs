//! Route definitions, one module per resource.

pub mod health;
pub mod orders;
