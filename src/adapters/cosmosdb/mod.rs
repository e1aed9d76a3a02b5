//! Azure Cosmos DB integration
//!
//! This module provides the [`DocumentStore`](crate::adapters::database::DocumentStore)
//! implementation backed by a Cosmos DB container, plus connection string parsing.

pub mod client;
pub mod connection;

pub use client::CosmosStore;
pub use connection::ConnectionString;
