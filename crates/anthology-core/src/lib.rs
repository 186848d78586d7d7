//! Core types and trait definitions for the Anthology poetry API.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::Storage`]; the HTTP layer consumes it.

pub mod dynasty;
pub mod error;
pub mod model;
pub mod row;
pub mod statement;
pub mod store;

pub use error::{Error, Result};
