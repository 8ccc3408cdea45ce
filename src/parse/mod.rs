//! Response parsing module
//!
//! Turns fetched response bodies into queryable documents.
//!
//! # Overview
//!
//! Adapters parse a response once into a [`Document`] during `fetch_page`
//! and answer every field accessor from it. Lookups fail with a parsing
//! error naming the missing path, which the aggregator records per field.

mod document;

pub use document::{integer_at, lookup_path, string_at, Document};
