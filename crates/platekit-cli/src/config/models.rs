use platekit::engine::config::ClassificationConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub spreadsheet: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub classification: ClassificationConfig,
    pub database_path: PathBuf,
    pub sheet_dir: PathBuf,
    pub include_results: bool,
    pub remote: RemoteConfig,
}
