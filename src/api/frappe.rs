//! HTTP client for the host framework's generic list endpoint.
//!
//! All dashboard data comes from a single RPC,
//! `/api/method/frappe.client.get_list`, authenticated with an API key/secret
//! pair of an integration user. The endpoint wraps its result in a
//! `{"message": [...]}` envelope; an absent or `null` message means "no
//! records".
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wadash::api::{FrappeClient, ListQuery, RecordSource};
//! use wadash::libs::config::ServerConfig;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = FrappeClient::new(&ServerConfig {
//!     api_url: "https://erp.example.com".to_string(),
//!     api_key: "key".to_string(),
//!     api_secret: "secret".to_string(),
//! })?;
//! let logs = client.get_list(&ListQuery::new("Warehouse Attendance Log").limit(50)).await?;
//! # Ok(())
//! # }
//! ```

use super::{ApiError, Filter, ListQuery, RecordSource};
use crate::libs::config::ServerConfig;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

const GET_LIST_URL: &str = "api/method/frappe.client.get_list";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Serialize)]
struct GetListBody<'a> {
    doctype: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    fields: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    filters: &'a [Filter],
    #[serde(skip_serializing_if = "Option::is_none")]
    order_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_page_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    message: Value,
}

#[derive(Debug, Clone)]
pub struct FrappeClient {
    client: Client,
    config: ServerConfig,
}

impl FrappeClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", APP_METADATA_NAME, APP_METADATA_VERSION))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), GET_LIST_URL)
    }

    fn authorization(&self) -> String {
        format!("token {}:{}", self.config.api_key, self.config.api_secret)
    }
}

impl RecordSource for FrappeClient {
    async fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>, ApiError> {
        let body = GetListBody {
            doctype: &query.doctype,
            fields: &query.fields,
            filters: &query.filters,
            order_by: query.order_by.as_deref(),
            limit_page_length: query.limit,
        };

        tracing::debug!(doctype = %query.doctype, limit = ?query.limit, "requesting record list");

        let response = self
            .client
            .post(self.url())
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope = response.json::<ListEnvelope>().await?;
        unwrap_message(envelope.message)
    }
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn unwrap_message(message: Value) -> Result<Vec<Value>, ApiError> {
    match message {
        Value::Null => Ok(Vec::new()),
        Value::Array(records) => Ok(records),
        other => Err(ApiError::Decode(format!("expected a record list, got {}", kind(&other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
