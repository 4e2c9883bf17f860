//! AWS-oriented adapters and handlers for the directory-sync and
//! comment-store Lambda functions.
//!
//! This crate owns runtime integration details (Lambda handlers, S3 and
//! DynamoDB adapters, environment configuration and log setup). Contracts,
//! record stamping and key derivation live in `pipeline_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;
