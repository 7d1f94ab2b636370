use platekit::engine::config::{DEFAULT_MULTIPLIER, ThresholdMethod};

pub struct DefaultsConfig {
    pub method: ThresholdMethod,
    pub multiplier: f64,
    pub remote_spreadsheet: String,
    pub include_results: bool,
    pub timeout_seconds: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            method: ThresholdMethod::StandardDeviation,
            multiplier: DEFAULT_MULTIPLIER,
            remote_spreadsheet: "ElisaData".to_string(),
            include_results: true,
            timeout_seconds: 30,
        }
    }
}
