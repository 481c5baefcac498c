//! student-registry - CRUD service for student records
//!
//! An Axum HTTP API over a relational record store with an optional
//! look-aside cache. Reads are served from the cache when possible; every
//! write evicts all cached student queries.

pub mod cache;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod storage;
pub mod student;
