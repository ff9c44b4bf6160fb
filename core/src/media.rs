//! Media platform facade. Adds nothing beyond the platform scope.

use std::fmt;

use crate::client::{CommonSenseClient, Platform};
use crate::config::ClientConfig;
use crate::envelope::Reply;
use crate::error::Result;
use crate::query::QueryOptions;

/// Client scoped to the `media` platform.
#[derive(Debug, Clone)]
pub struct MediaApi {
    client: CommonSenseClient,
}

impl MediaApi {
    pub fn new(config: ClientConfig) -> Self {
        Self::from_client(&CommonSenseClient::new(config))
    }

    pub fn from_client(client: &CommonSenseClient) -> Self {
        Self {
            client: client.clone().with_platform(Platform::Media),
        }
    }

    pub fn client(&self) -> &CommonSenseClient {
        &self.client
    }

    pub fn platform(&self) -> Platform {
        self.client.platform()
    }

    pub fn version(&self) -> u32 {
        self.client.version()
    }

    pub async fn request(&self, path: &str, options: &QueryOptions) -> Result<Reply> {
        self.client.request(path, options).await
    }

    pub async fn get_list(&self, content_type: &str, options: &QueryOptions) -> Result<Reply> {
        self.client.get_list(content_type, options).await
    }

    pub async fn get_item(
        &self,
        content_type: &str,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.client.get_item(content_type, id, options).await
    }
}
