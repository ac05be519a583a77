//! HTTP handlers for the book catalog and service probes.

pub mod book;
pub mod common;
