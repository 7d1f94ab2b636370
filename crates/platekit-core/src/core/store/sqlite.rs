use crate::core::models::address::WellAddress;
use crate::core::models::category::Category;
use crate::core::models::plate::PlateTable;
use crate::core::models::well::{WellResult, parse_raw_value};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub type PlateId = i64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error while opening the database: {0}")]
    Io(#[from] io::Error),
}

/// A plate read back from the store, with the metadata of the save it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPlate {
    pub id: PlateId,
    pub created_at: String,
    pub plate: PlateTable,
}

/// One row of [`PlateStore::list_plates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateSummary {
    pub id: PlateId,
    pub name: String,
    pub created_at: String,
    pub well_count: usize,
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS plates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS wells (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plate_id INTEGER,
        well TEXT,
        sample TEXT,
        value REAL,
        category TEXT,
        serum TEXT,
        normalized REAL,
        result TEXT,
        FOREIGN KEY(plate_id) REFERENCES plates(id)
    );
"#;

/// Columns added after the first release of the schema; older databases gain them on open.
const LATE_WELL_COLUMNS: [(&str, &str); 4] = [
    ("category", "TEXT"),
    ("serum", "TEXT"),
    ("normalized", "REAL"),
    ("result", "TEXT"),
];

/// SQLite-backed plate storage.
///
/// Supports both file-backed and in-memory databases. Opening an existing database created by
/// an older schema adds the missing `wells` columns in place.
pub struct PlateStore {
    conn: Connection,
}

impl PlateStore {
    /// Opens (or creates) the database at `path`, creating its parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!("Opening plate database at {:?}", path);
        Self::init_with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init_with_connection(Connection::open_in_memory()?)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        migrate_wells(&conn)?;
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_plates_name ON plates(name);
             CREATE INDEX IF NOT EXISTS idx_wells_plate_well ON wells(plate_id, well);",
        )?;
        Ok(Self { conn })
    }

    /// Persists `plate` as a new save and returns its id.
    ///
    /// A new `plates` row is always created, even if a plate with the same name exists. All 96
    /// wells are written in the same transaction, so a failed save leaves no partial plate.
    pub fn save(&mut self, plate: &PlateTable) -> Result<PlateId, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("INSERT INTO plates (name) VALUES (?1)", params![plate.name()])?;
        let plate_id = tx.last_insert_rowid();

        {
            let mut insert = tx.prepare(
                "INSERT INTO wells (plate_id, well, sample, value, category, serum, normalized, result) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for well in plate.wells() {
                let result = well.result().map(|r| r.as_str());
                insert.execute(params![
                    plate_id,
                    well.address().to_string(),
                    well.sample_name(),
                    well.raw_value(),
                    well.category().as_label(),
                    well.label(),
                    well.normalized_value(),
                    result,
                ])?;
            }
        }

        tx.commit()?;
        info!(
            "Saved plate '{}' as id {} ({} wells)",
            plate.name(),
            plate_id,
            plate.wells().len()
        );
        Ok(plate_id)
    }

    /// Loads the most recent save of the plate called `name`, or `None` if it was never saved.
    ///
    /// Wells missing from the stored rows stay empty. Rows with an unreadable address are
    /// skipped and unknown category or result labels are dropped, each with a warning.
    pub fn fetch_latest(&self, name: &str) -> Result<Option<StoredPlate>, StoreError> {
        let header: Option<(PlateId, Option<String>)> = self
            .conn
            .query_row(
                "SELECT id, created_at FROM plates WHERE name = ?1 ORDER BY id DESC LIMIT 1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((id, created_at)) = header else {
            debug!("No saved plate named '{}'", name);
            return Ok(None);
        };

        let mut plate = PlateTable::new(name);
        let mut stmt = self.conn.prepare(
            "SELECT well, sample, value, category, serum, normalized, result \
             FROM wells WHERE plate_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok(StoredWell {
                well: row.get(0)?,
                sample: row.get(1)?,
                value: row.get(2)?,
                category: row.get(3)?,
                serum: row.get(4)?,
                normalized: row.get(5)?,
                result: row.get(6)?,
            })
        })?;

        for row in rows {
            row?.restore_into(&mut plate);
        }

        Ok(Some(StoredPlate {
            id,
            created_at: created_at.unwrap_or_default(),
            plate,
        }))
    }

    /// All saves, oldest first.
    pub fn list_plates(&self) -> Result<Vec<PlateSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT plates.id, plates.name, plates.created_at, COUNT(wells.id) \
             FROM plates LEFT JOIN wells ON wells.plate_id = plates.id \
             GROUP BY plates.id ORDER BY plates.id",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(PlateSummary {
                    id: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    created_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    well_count: row.get::<_, i64>(3)?.max(0) as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }
}

fn migrate_wells(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("PRAGMA table_info(wells)")?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    for (column, sql_type) in LATE_WELL_COLUMNS {
        if !existing.iter().any(|c| c == column) {
            info!("Adding missing column '{}' to the wells table", column);
            conn.execute_batch(&format!(
                "ALTER TABLE wells ADD COLUMN {} {}",
                column, sql_type
            ))?;
        }
    }
    Ok(())
}

struct StoredWell {
    well: Option<String>,
    sample: Option<String>,
    value: Value,
    category: Option<String>,
    serum: Option<String>,
    normalized: Option<f64>,
    result: Option<String>,
}

/// Older databases may hold values as text or integers.
fn value_to_f64(value: Value) -> Option<f64> {
    match value {
        Value::Real(v) => Some(v).filter(|v| v.is_finite()),
        Value::Integer(v) => Some(v as f64),
        Value::Text(text) => parse_raw_value(&text),
        Value::Null | Value::Blob(_) => None,
    }
}

impl StoredWell {
    fn restore_into(self, plate: &mut PlateTable) {
        let well_text = self.well.unwrap_or_default();
        let address = match WellAddress::parse(&well_text) {
            Ok(address) => address,
            Err(e) => {
                warn!("Skipping stored well row: {}", e);
                return;
            }
        };

        let category = match self.category.as_deref().unwrap_or_default().parse::<Category>() {
            Ok(category) => category,
            Err(e) => {
                warn!("Well {}: {}; treating it as unassigned", address, e);
                Category::Unassigned
            }
        };
        let result = self
            .result
            .filter(|text| !text.trim().is_empty())
            .and_then(|text| match text.parse::<WellResult>() {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Well {}: {}", address, e);
                    None
                }
            });

        let well = plate.well_mut(address);
        well.sample_name = self.sample.unwrap_or_default();
        well.raw_value = value_to_f64(self.value);
        well.category = category;
        well.label = self.serum.filter(|s| !s.is_empty());
        plate.restore_derived(address, self.normalized, result);
    }
}
