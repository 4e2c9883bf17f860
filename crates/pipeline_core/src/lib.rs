//! Domain primitives shared by the directory-sync and comment-store handlers.
//!
//! This crate owns request/response contracts, the typed handler error
//! taxonomy, record stamping, and object key derivation. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod error;
pub mod record;
pub mod storage_keys;
