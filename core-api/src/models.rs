//! Request and response models of the STRM Linker backend
//!
//! Field names follow the backend's JSON exactly. Optional response fields
//! are skipped when absent so a decoded value re-serializes to the body the
//! server sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

fn default_target_formats() -> Vec<String> {
    vec!["mp4".to_string(), "mkv".to_string()]
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Scanning
// ============================================================================

/// Body of `POST /config/scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub directory: String,
    #[serde(default = "default_target_formats")]
    pub target_formats: Vec<String>,
    #[serde(default = "default_true")]
    pub recursive: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl ScanConfig {
    /// Recursive scan of `directory` for the default video formats.
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            target_formats: default_target_formats(),
            recursive: true,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u64>,
    pub processed: u64,
    pub created_links: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u64>,
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Value>>,
    pub duration: f64,
}

/// Response of `POST /config/cleanup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub directory: String,
    pub removed_count: u64,
    #[serde(default)]
    pub errors: Vec<Value>,
    pub duration: f64,
}

// ============================================================================
// Watch service
// ============================================================================

/// Body of `POST /config/watch/add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    pub directory: String,
    #[serde(default = "default_target_formats")]
    pub target_formats: Vec<String>,
    #[serde(default = "default_true")]
    pub recursive: bool,
}

impl WatchConfig {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            target_formats: default_target_formats(),
            recursive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedDirectory {
    pub path: String,
    pub target_formats: Vec<String>,
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchStatus {
    pub is_running: bool,
    #[serde(default)]
    pub watch_directories: Vec<WatchedDirectory>,
}

// ============================================================================
// Scheduler
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Cron,
    Interval,
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleType::Cron => f.write_str("cron"),
            ScheduleType::Interval => f.write_str("interval"),
        }
    }
}

/// Body of `POST /config/schedule/add`
///
/// `schedule_params` is passed to the backend scheduler as-is, e.g.
/// `{"hour": 3, "minute": 0}` for cron or `{"hours": 6}` for interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub task_id: String,
    pub directory: String,
    #[serde(default = "default_target_formats")]
    pub target_formats: Vec<String>,
    pub schedule_type: ScheduleType,
    pub schedule_params: Map<String, Value>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task_id: String,
    pub directory: String,
    #[serde(default)]
    pub target_formats: Vec<String>,
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub schedule_params: Map<String, Value>,
    pub recursive: bool,
    pub enabled: bool,
    pub created_at: Option<String>,
    pub last_run: Option<String>,
    #[serde(default)]
    pub run_count: u64,
    pub next_run: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub is_running: bool,
}

/// `{"message": ...}` acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Logs
// ============================================================================

/// Query of `GET /logs/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// One backend log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub asctime: String,
    pub name: String,
    pub levelname: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLevelOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLevels {
    pub levels: Vec<LogLevelOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStats {
    pub total: u64,
    #[serde(default)]
    pub level_counts: HashMap<String, u64>,
    pub recent_errors: u64,
    pub latest_log_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Txt,
}

/// Query of `GET /logs/export`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportQuery {
    pub format_type: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

// ============================================================================
// Directory browsing
// ============================================================================

/// Query of `GET /browse/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_strm: Option<bool>,
}

impl BrowseQuery {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryItem {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_strm_files: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseResult {
    pub current_path: String,
    pub parent_path: Option<String>,
    pub items: Vec<DirectoryItem>,
    pub total_items: u64,
    pub directories_count: u64,
    pub files_count: u64,
}

/// Query of `GET /browse/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            root_path: None,
            max_depth: None,
            max_results: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub path: String,
    pub relative_path: String,
    pub depth: u32,
    pub has_strm_files: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub root_path: String,
    pub results: Vec<SearchHit>,
    pub total_found: u64,
    pub max_results_reached: bool,
}

/// Query of `GET /browse/autocomplete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteQuery {
    pub partial_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl AutocompleteQuery {
    pub fn new(partial_path: impl Into<String>) -> Self {
        Self {
            partial_path: partial_path.into(),
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSuggestion {
    pub path: String,
    pub name: String,
    pub has_strm_files: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteResult {
    pub partial_path: String,
    pub suggestions: Vec<PathSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_suggestions: Option<u64>,
    /// Set when the parent directory is missing or unreadable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drive {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrivesResult {
    pub drives: Vec<Drive>,
    pub current_os: String,
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub scheduler: bool,
    pub watcher: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scan_config_defaults() {
        let config: ScanConfig = serde_json::from_value(json!({ "directory": "/media" })).unwrap();
        assert_eq!(config, ScanConfig::new("/media"));
        assert_eq!(config.target_formats, vec!["mp4", "mkv"]);
        assert!(config.recursive);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_scan_result_preserves_body() {
        let body = json!({
            "success": true,
            "directory": "/media/tv",
            "total_files": 12,
            "processed": 12,
            "created_links": 10,
            "skipped": 2,
            "errors": [],
            "details": [{ "file": "a.strm", "status": "created" }],
            "duration": 0.42
        });

        let result: ScanResult = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), body);
    }

    #[test]
    fn test_schedule_config_serialization() {
        let mut params = Map::new();
        params.insert("hour".to_string(), json!(3));

        let config = ScheduleConfig {
            task_id: "nightly".to_string(),
            directory: "/media".to_string(),
            target_formats: vec!["mkv".to_string()],
            schedule_type: ScheduleType::Cron,
            schedule_params: params,
            enabled: true,
            recursive: false,
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["schedule_type"], "cron");
        assert_eq!(value["schedule_params"]["hour"], 3);
    }

    #[test]
    fn test_log_record_keeps_extra_fields() {
        let record: LogRecord = serde_json::from_value(json!({
            "asctime": "2024-05-01 10:00:00",
            "name": "scanner",
            "levelname": "INFO",
            "message": "scan finished",
            "lineno": 42
        }))
        .unwrap();

        assert_eq!(record.levelname, "INFO");
        assert_eq!(record.extra.get("lineno"), Some(&json!(42)));
    }

    #[test]
    fn test_log_levels_tolerate_missing_color() {
        let levels: LogLevels = serde_json::from_value(json!({
            "levels": [
                { "value": "DEBUG", "label": "调试", "color": "#909399" },
                { "value": "INFO", "label": "信息" }
            ]
        }))
        .unwrap();

        assert_eq!(levels.levels[0].color.as_deref(), Some("#909399"));
        assert_eq!(levels.levels[1].color, None);
    }

    #[test]
    fn test_drive_type_field() {
        let drive: Drive = serde_json::from_value(json!({
            "path": "/mnt",
            "name": "挂载点 (/mnt)",
            "type": "directory"
        }))
        .unwrap();
        assert_eq!(drive.kind, "directory");
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_value(json!({
            "status": "healthy",
            "version": "1.0.0",
            "services": { "scheduler": true, "watcher": false }
        }))
        .unwrap();
        assert!(health.is_healthy());
        assert!(!health.services.watcher);
    }
}
