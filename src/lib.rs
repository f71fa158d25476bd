//! Kubernetes secret and Helm overrides generation for Grafana Enterprise Metrics.
//!
//! `gemsecrets` turns credentials (admin username and password, S3 access
//! keys, license tokens, bucket and endpoint settings) into the manifests a
//! GEM deployment consumes. Every run follows the same straight line:
//! resolve input, encode, render, write.
//!
//! # Modules
//!
//! - [`config`]: Layered input resolution (CLI > env > file > prompt)
//! - [`manifest`]: Base64 encoding and the secret and overrides document shapes
//! - [`files`]: Capability-based input reads and per-file manifest writes
//! - [`api`]: Generator orchestration for the CLI and library embedders
//! - [`error`]: Semantic error types for the application

pub mod api;
pub mod config;
pub mod error;
pub mod files;
pub mod manifest;
