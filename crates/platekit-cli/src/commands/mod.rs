pub mod analyze;
pub mod data;
pub mod fetch;
pub mod list;
pub mod save;
