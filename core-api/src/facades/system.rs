use std::sync::Arc;

use crate::descriptor::RequestDescriptor;
use crate::error::Result;
use crate::models::HealthStatus;
use crate::transport::ApiClient;

#[derive(Debug, Clone)]
pub struct SystemApi {
    client: Arc<ApiClient>,
}

impl SystemApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Backend health probe. Polled in the background, so no overlay.
    pub async fn get_health(&self) -> Result<HealthStatus> {
        let request = RequestDescriptor::get("/health").with_loading(false);
        self.client.request(request).await
    }
}
