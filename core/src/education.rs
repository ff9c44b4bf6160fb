//! Education platform facade.
//!
//! # Design
//! Each content type gets a named list/item accessor pair
//! (`get_products_list`, `get_app_flows_item`, ...). They are written out by
//! hand over the generic `list`/`item` pair. `ContentType` carries the
//! name mapping (`app_flows` -> `AppFlows` -> `getAppFlowsList`) for callers
//! that dispatch on the service's method names.

use std::fmt;
use std::str::FromStr;

use crate::client::{CommonSenseClient, Platform};
use crate::config::ClientConfig;
use crate::envelope::Reply;
use crate::error::Result;
use crate::query::QueryOptions;

/// Content types published on the education platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Products,
    Blogs,
    AppFlows,
    Lists,
    UserReviews,
    Boards,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Products,
        ContentType::Blogs,
        ContentType::AppFlows,
        ContentType::Lists,
        ContentType::UserReviews,
        ContentType::Boards,
    ];

    /// Path segment used by the service, e.g. `app_flows`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Products => "products",
            ContentType::Blogs => "blogs",
            ContentType::AppFlows => "app_flows",
            ContentType::Lists => "lists",
            ContentType::UserReviews => "user_reviews",
            ContentType::Boards => "boards",
        }
    }

    /// UpperCamel form used in accessor names, e.g. `AppFlows`.
    pub fn type_name(&self) -> &'static str {
        match self {
            ContentType::Products => "Products",
            ContentType::Blogs => "Blogs",
            ContentType::AppFlows => "AppFlows",
            ContentType::Lists => "Lists",
            ContentType::UserReviews => "UserReviews",
            ContentType::Boards => "Boards",
        }
    }

    pub fn list_method(&self) -> String {
        format!("get{}List", self.type_name())
    }

    pub fn item_method(&self) -> String {
        format!("get{}Item", self.type_name())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown education content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

/// Convert an underscore or dash separated identifier to UpperCamel case.
pub fn upper_camel(identifier: &str) -> String {
    identifier
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Client scoped to the `education` platform.
#[derive(Debug, Clone)]
pub struct EducationApi {
    client: CommonSenseClient,
}

impl EducationApi {
    pub fn new(config: ClientConfig) -> Self {
        Self::from_client(&CommonSenseClient::new(config))
    }

    pub fn from_client(client: &CommonSenseClient) -> Self {
        Self {
            client: client.clone().with_platform(Platform::Education),
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

    pub fn types(&self) -> &'static [ContentType] {
        &ContentType::ALL
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

    pub async fn list(&self, content_type: ContentType, options: &QueryOptions) -> Result<Reply> {
        self.client.get_list(content_type.as_str(), options).await
    }

    pub async fn item(
        &self,
        content_type: ContentType,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.client.get_item(content_type.as_str(), id, options).await
    }

    /// Taxonomy terms of one vocabulary. Default query options only.
    pub async fn get_terms_list(&self, vocabulary: &str) -> Result<Reply> {
        self.client
            .request(&format!("terms/{vocabulary}"), &QueryOptions::default())
            .await
    }

    /// Free-text search. `content_type` is passed through unchecked.
    pub async fn search(
        &self,
        content_type: &str,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.client
            .request(&format!("search/{content_type}/{query}"), options)
            .await
    }

    pub async fn get_products_list(&self, options: &QueryOptions) -> Result<Reply> {
        self.list(ContentType::Products, options).await
    }

    pub async fn get_products_item(
        &self,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.item(ContentType::Products, id, options).await
    }

    pub async fn get_blogs_list(&self, options: &QueryOptions) -> Result<Reply> {
        self.list(ContentType::Blogs, options).await
    }

    pub async fn get_blogs_item(
        &self,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.item(ContentType::Blogs, id, options).await
    }

    pub async fn get_app_flows_list(&self, options: &QueryOptions) -> Result<Reply> {
        self.list(ContentType::AppFlows, options).await
    }

    pub async fn get_app_flows_item(
        &self,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.item(ContentType::AppFlows, id, options).await
    }

    pub async fn get_lists_list(&self, options: &QueryOptions) -> Result<Reply> {
        self.list(ContentType::Lists, options).await
    }

    pub async fn get_lists_item(
        &self,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.item(ContentType::Lists, id, options).await
    }

    pub async fn get_user_reviews_list(&self, options: &QueryOptions) -> Result<Reply> {
        self.list(ContentType::UserReviews, options).await
    }

    pub async fn get_user_reviews_item(
        &self,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.item(ContentType::UserReviews, id, options).await
    }

    pub async fn get_boards_list(&self, options: &QueryOptions) -> Result<Reply> {
        self.list(ContentType::Boards, options).await
    }

    pub async fn get_boards_item(
        &self,
        id: impl fmt::Display,
        options: &QueryOptions,
    ) -> Result<Reply> {
        self.item(ContentType::Boards, id, options).await
    }
}
