//! # Engine Module
//!
//! The computational core of platekit: everything that turns a populated plate into categorized,
//! normalized and classified wells.
//!
//! ## Overview
//!
//! All engine operations are synchronous, bounded computations over the 96-cell grid. They run
//! to completion on the caller's thread and either update the plate's derived fields completely
//! or leave them untouched and report an error.
//!
//! ## Architecture
//!
//! - **Category Assignment** ([`assign`]) - Address-list parsing and last-write-wins tagging
//! - **Normalization** ([`normalization`]) - Blank-mean background subtraction
//! - **Classification** ([`classification`]) - Negative-control thresholds and positive/negative
//!   calls
//! - **Configuration** ([`config`]) - Threshold method and multiplier settings
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for front-ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod assign;
pub mod classification;
pub mod config;
pub mod error;
pub mod normalization;
pub mod progress;
pub(crate) mod stats;
