//! Layered application configuration.
//!
//! Values resolve in the order command-line flag, `--set KEY=VALUE`, config file, built-in
//! default.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{ConfigOverrides, build_config};
pub use models::{AppConfig, RemoteConfig};
