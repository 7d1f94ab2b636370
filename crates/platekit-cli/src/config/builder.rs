use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, RemoteConfig};
use crate::cli::MethodArgs;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use platekit::engine::config::{ClassificationConfigBuilder, ThresholdMethod, multiplier_from_text};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Per-command flags that take precedence over every other configuration source.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub method: Option<String>,
    pub multiplier: Option<String>,
}

impl From<&MethodArgs> for ConfigOverrides {
    fn from(args: &MethodArgs) -> Self {
        Self {
            method: args.method.clone(),
            multiplier: args.multiplier.clone(),
        }
    }
}

pub fn build_config(
    overrides: &ConfigOverrides,
    config_path: Option<&Path>,
    set_values: &[String],
    data_manager: &DataManager,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let method = match overrides.method.as_deref().or(analysis_file.method.as_deref()) {
        Some(text) => {
            ThresholdMethod::from_str(text).map_err(|e| CliError::Config(e.to_string()))?
        }
        None => defaults.method,
    };
    let builder = ClassificationConfigBuilder::new().method(method);
    let builder = match &overrides.multiplier {
        Some(text) => builder.multiplier_text(text),
        None => builder.multiplier(analysis_file.multiplier.unwrap_or(defaults.multiplier)),
    };
    let classification = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let storage_file = file_config.storage.take().unwrap_or_default();
    let database_path = storage_file
        .database
        .unwrap_or_else(|| data_manager.default_database_path());

    let export_file = file_config.export.take().unwrap_or_default();
    let sheet_dir = export_file
        .sheet_dir
        .unwrap_or_else(|| data_manager.default_sheet_dir());
    let include_results = export_file
        .include_results
        .unwrap_or(defaults.include_results);
    let remote = RemoteConfig {
        url: export_file.remote_url.filter(|url| !url.trim().is_empty()),
        spreadsheet: export_file
            .remote_spreadsheet
            .unwrap_or(defaults.remote_spreadsheet),
        timeout: Duration::from_secs(
            export_file
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
        ),
    };

    Ok(AppConfig {
        classification,
        database_path,
        sheet_dir,
        include_results,
        remote,
    })
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "analysis.method" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .method = Some(value_str.trim().to_string());
            }
            "analysis.multiplier" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .multiplier = Some(multiplier_from_text(value_str));
            }
            "storage.database" => {
                config
                    .storage
                    .get_or_insert_with(Default::default)
                    .database = Some(value_str.trim().into());
            }
            "export.sheet-dir" => {
                config.export.get_or_insert_with(Default::default).sheet_dir =
                    Some(value_str.trim().into());
            }
            "export.remote-url" => {
                config.export.get_or_insert_with(Default::default).remote_url =
                    Some(value_str.trim().to_string());
            }
            "export.remote-spreadsheet" => {
                config
                    .export
                    .get_or_insert_with(Default::default)
                    .remote_spreadsheet = Some(value_str.trim().to_string());
            }
            "export.include-results" => {
                config
                    .export
                    .get_or_insert_with(Default::default)
                    .include_results = Some(parse_value(key, value_str, "boolean")?);
            }
            "export.timeout-seconds" => {
                config
                    .export
                    .get_or_insert_with(Default::default)
                    .timeout_seconds = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
