//! Typed repository
//!
//! [`Repository`] is the public entry point of the crate: CRUD, queries,
//! counts and container administration for one [`Entity`](crate::domain::Entity)
//! type stored in one container.

pub mod page;
pub mod repo;
pub mod status;

pub use page::Page;
pub use repo::Repository;
pub use status::{ensure_success, is_success_status};
