//! Network record store
//!
//! Speaks the PocketBase REST dialect:
//! `GET/POST/PATCH/DELETE /api/collections/{collection}/records[/{id}]`,
//! with `filter`/`sort` query parameters and page-based listing.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::store::RecordStore;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Page size used when draining a full list.
const LIST_PAGE_SIZE: u32 = 200;

/// HTTP implementation of [`RecordStore`].
#[derive(Debug, Clone)]
pub struct PocketBaseClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    auth_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    page: u32,
    #[serde(rename = "totalPages")]
    total_pages: u32,
    items: Vec<Value>,
}

impl PocketBaseClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            auth_user_id: config.auth_user_id.clone(),
        })
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{}/records", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.records_url(collection), id)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.header(reqwest::header::AUTHORIZATION, token.clone()),
            None => req,
        }
    }

    /// Map an error status onto the gateway taxonomy.
    async fn check(
        resp: reqwest::Response,
        collection: &str,
        id: &str,
    ) -> ClientResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden(body),
            404 => ClientError::not_found(collection, id),
            400 => ClientError::Validation(body),
            _ => ClientError::Internal(format!("{status}: {body}")),
        })
    }
}

#[async_trait]
impl RecordStore for PocketBaseClient {
    async fn get_record(&self, collection: &str, id: &str) -> ClientResult<Value> {
        tracing::debug!(collection, id, "get record");
        let resp = self
            .authorize(self.http.get(self.record_url(collection, id)))
            .send()
            .await?;
        let resp = Self::check(resp, collection, id).await?;
        Ok(resp.json().await?)
    }

    async fn list_records(
        &self,
        collection: &str,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> ClientResult<Vec<Value>> {
        tracing::debug!(collection, ?filter, ?sort, "list records");
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut req = self
                .authorize(self.http.get(self.records_url(collection)))
                .query(&[("page", page.to_string()), ("perPage", LIST_PAGE_SIZE.to_string())]);
            if let Some(filter) = filter {
                req = req.query(&[("filter", filter)]);
            }
            if let Some(sort) = sort {
                req = req.query(&[("sort", sort)]);
            }
            let resp = Self::check(req.send().await?, collection, "*").await?;
            let list: ListPage = resp.json().await?;
            items.extend(list.items);
            if list.page >= list.total_pages {
                break;
            }
            page = list.page + 1;
        }
        Ok(items)
    }

    async fn create_record(&self, collection: &str, payload: Value) -> ClientResult<Value> {
        tracing::debug!(collection, "create record");
        let resp = self
            .authorize(self.http.post(self.records_url(collection)))
            .json(&payload)
            .send()
            .await?;
        let resp = Self::check(resp, collection, "new").await?;
        Ok(resp.json().await?)
    }

    async fn update_record(&self, collection: &str, id: &str, patch: Value) -> ClientResult<Value> {
        tracing::debug!(collection, id, "update record");
        let resp = self
            .authorize(self.http.patch(self.record_url(collection, id)))
            .json(&patch)
            .send()
            .await?;
        let resp = Self::check(resp, collection, id).await?;
        Ok(resp.json().await?)
    }

    async fn delete_record(&self, collection: &str, id: &str) -> ClientResult<()> {
        tracing::debug!(collection, id, "delete record");
        let resp = self
            .authorize(self.http.delete(self.record_url(collection, id)))
            .send()
            .await?;
        Self::check(resp, collection, id).await?;
        Ok(())
    }

    fn auth_user_id(&self) -> Option<String> {
        self.auth_user_id.clone()
    }
}
