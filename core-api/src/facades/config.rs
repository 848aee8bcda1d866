use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::debug;

use crate::descriptor::{encode_segment, RequestDescriptor};
use crate::error::Result;
use crate::models::{
    CleanupResult, MessageResponse, ScanConfig, ScanResult, ScheduleConfig, ScheduledTask,
    SchedulerStatus, WatchConfig, WatchStatus,
};
use crate::transport::ApiClient;

/// Scanning, watch service and scheduled task management
#[derive(Debug, Clone)]
pub struct ConfigApi {
    client: Arc<ApiClient>,
}

impl ConfigApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Scan a directory and create subtitle links.
    pub async fn scan(&self, config: &ScanConfig) -> Result<ScanResult> {
        debug!(
            directory = %strip_path(&config.directory),
            dry_run = config.dry_run,
            "Scan requested"
        );
        self.client.post("/config/scan", config).await
    }

    /// Remove broken links below `directory`.
    pub async fn cleanup(&self, directory: &str, recursive: bool) -> Result<CleanupResult> {
        debug!(directory = %strip_path(directory), recursive, "Cleanup requested");
        let request = RequestDescriptor::post("/config/cleanup")
            .query("directory", directory)
            .query("recursive", recursive);
        self.client.request(request).await
    }

    pub async fn get_watch_status(&self) -> Result<WatchStatus> {
        self.client.get("/config/watch/status").await
    }

    pub async fn start_watcher(&self) -> Result<MessageResponse> {
        self.client.request(RequestDescriptor::post("/config/watch/start")).await
    }

    pub async fn stop_watcher(&self) -> Result<MessageResponse> {
        self.client.request(RequestDescriptor::post("/config/watch/stop")).await
    }

    pub async fn add_watch_directory(&self, config: &WatchConfig) -> Result<MessageResponse> {
        self.client.post("/config/watch/add", config).await
    }

    pub async fn remove_watch_directory(&self, directory: &str) -> Result<MessageResponse> {
        let request =
            RequestDescriptor::delete("/config/watch/remove").query("directory", directory);
        self.client.request(request).await
    }

    pub async fn get_scheduled_tasks(&self) -> Result<Vec<ScheduledTask>> {
        self.client.get("/config/schedule/tasks").await
    }

    pub async fn add_scheduled_task(&self, config: &ScheduleConfig) -> Result<MessageResponse> {
        self.client.post("/config/schedule/add", config).await
    }

    pub async fn remove_scheduled_task(&self, task_id: &str) -> Result<MessageResponse> {
        self.client.delete(&task_path("remove", task_id)).await
    }

    pub async fn enable_scheduled_task(&self, task_id: &str) -> Result<MessageResponse> {
        self.client
            .request(RequestDescriptor::post(task_path("enable", task_id)))
            .await
    }

    pub async fn disable_scheduled_task(&self, task_id: &str) -> Result<MessageResponse> {
        self.client
            .request(RequestDescriptor::post(task_path("disable", task_id)))
            .await
    }

    /// Trigger a task outside its schedule.
    pub async fn run_task_now(&self, task_id: &str) -> Result<MessageResponse> {
        self.client
            .request(RequestDescriptor::post(task_path("run", task_id)))
            .await
    }

    pub async fn get_scheduler_status(&self) -> Result<SchedulerStatus> {
        self.client.get("/config/schedule/status").await
    }
}

fn task_path(action: &str, task_id: &str) -> String {
    format!("/config/schedule/{}/{}", action, encode_segment(task_id))
}
