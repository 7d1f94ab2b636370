use crate::config::RemoteConfig;
use platekit::core::io::sheet::ExportTable;
use platekit::core::io::traits::{ExportError, ExportReceipt, ExportSink};
use serde::Serialize;
use tracing::{debug, info};

const SINK_NAME: &str = "remote";

/// The JSON body posted to the spreadsheet endpoint: one new worksheet per plate.
#[derive(Debug, Serialize)]
pub struct WorksheetPayload<'a> {
    pub spreadsheet: &'a str,
    pub worksheet: &'a str,
    pub rows: Vec<Vec<String>>,
}

impl<'a> WorksheetPayload<'a> {
    pub fn new(spreadsheet: &'a str, table: &'a ExportTable) -> Self {
        Self {
            spreadsheet,
            worksheet: &table.title,
            rows: table.to_values(),
        }
    }
}

/// Uploads plates to a remote spreadsheet service over HTTP.
///
/// Uses a blocking client; callers inside the async runtime run it under `block_in_place`.
pub struct RemoteSheetSink {
    config: RemoteConfig,
}

impl RemoteSheetSink {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }
}

impl ExportSink for RemoteSheetSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    fn export(&self, table: &ExportTable) -> Result<ExportReceipt, ExportError> {
        let Some(url) = self.config.url.as_deref() else {
            return Err(ExportError::Unavailable {
                sink: SINK_NAME.to_string(),
                reason: "no endpoint configured (set export.remote-url)".to_string(),
            });
        };

        let payload = WorksheetPayload::new(&self.config.spreadsheet, table);
        debug!(
            "Posting {} row(s) for worksheet '{}' to {}",
            payload.rows.len(),
            payload.worksheet,
            url
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| ExportError::Remote(e.to_string()))?;
        client
            .post(url)
            .json(&payload)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| ExportError::Remote(e.to_string()))?;

        info!(
            "Uploaded plate '{}' to spreadsheet '{}'",
            table.title, self.config.spreadsheet
        );
        Ok(ExportReceipt {
            sink: SINK_NAME.to_string(),
            location: format!("{} / {}", self.config.spreadsheet, table.title),
        })
    }
}
