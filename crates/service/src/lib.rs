//! Service layer: the storage capability, session persistence and call-session
//! management consumed by the HTTP server.
//! - Entity definitions and validation live in the `models` crate.
//! - One in-memory storage adapter today; the trait leaves room for a
//!   persistent adapter later.

pub mod calls;
pub mod errors;
pub mod fixtures;
pub mod session;
pub mod storage;
