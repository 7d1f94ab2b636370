//! Durable plate storage.
//!
//! Every save appends a new `plates` row together with its 96 `wells` rows; reading a plate by
//! name returns the most recent save. Categories and results are stored as their text labels
//! (`"K+"`, `"K- healthy"`, `"positive"`, ...) and absent numbers as `NULL`.

mod sqlite;

pub use sqlite::{PlateId, PlateStore, PlateSummary, StoreError, StoredPlate};
