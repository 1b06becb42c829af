//! Domain model and pure helpers for the character catalog.
//!
//! This crate has no I/O. It holds the wire records, the client-side
//! filter/search reducer, the URL-suffix reference parser, and the
//! list-field codec shared by the cache layer.

pub mod codec;
pub mod error;
pub mod filter;
pub mod models;
pub mod refs;
pub mod types;
