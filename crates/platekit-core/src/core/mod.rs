//! # Core Module
//!
//! This module provides the fundamental building blocks of platekit: the plate data model and the
//! I/O and storage layers that move plates in and out of the library.
//!
//! ## Architecture
//!
//! - **Plate Representation** ([`models`]) - Well addresses, categories, well records and the
//!   fixed 8x12 plate grid
//! - **File I/O** ([`io`]) - Legacy free-text plate tables, CSV layouts and tabular export sinks
//! - **Persistence** ([`store`]) - The relational plate store backed by SQLite
//!
//! Nothing in this module computes derived values; normalization and classification live in
//! [`crate::engine`].

pub mod io;
pub mod models;
pub mod store;
