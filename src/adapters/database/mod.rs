//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction over the document service,
//! so the repository works with Cosmos DB or an in-memory store.

pub mod factory;
pub mod traits;

pub use factory::create_document_store;
pub use traits::{DocumentStore, PageStream, QueryOptions, QueryPage, WriteResponse};
