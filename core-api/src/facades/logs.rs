use bytes::Bytes;
use std::sync::Arc;

use crate::descriptor::{RequestDescriptor, ResponseType};
use crate::error::Result;
use crate::models::{ExportQuery, LogLevels, LogQuery, LogRecord, LogStats, MessageResponse};
use crate::transport::ApiClient;

/// Backend log viewing and maintenance
#[derive(Debug, Clone)]
pub struct LogsApi {
    client: Arc<ApiClient>,
}

impl LogsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_logs(&self, query: &LogQuery) -> Result<Vec<LogRecord>> {
        let request = RequestDescriptor::get("/logs/").query_from(query)?;
        self.client.request(request).await
    }

    pub async fn get_log_levels(&self) -> Result<LogLevels> {
        self.client.get("/logs/levels").await
    }

    pub async fn get_log_stats(&self) -> Result<LogStats> {
        self.client.get("/logs/stats").await
    }

    /// Delete log entries older than `days` days.
    pub async fn clear_old_logs(&self, days: u32) -> Result<MessageResponse> {
        let request = RequestDescriptor::delete("/logs/clear").query("days", days);
        self.client.request(request).await
    }

    /// Download logs as a JSON or plain-text file.
    ///
    /// Runs without the loading overlay; the body is returned undecoded.
    pub async fn export_logs(&self, query: &ExportQuery) -> Result<Bytes> {
        let request = RequestDescriptor::get("/logs/export")
            .query_from(query)?
            .with_response_type(ResponseType::Binary)
            .with_loading(false);
        self.client.send(request).await?.into_bytes()
    }

    /// Ask the backend to emit one log line per level.
    pub async fn test_logging(&self) -> Result<MessageResponse> {
        self.client.request(RequestDescriptor::post("/logs/test")).await
    }
}
