//! Record source modules for the attendance backend.
//!
//! Every view in wadash is built from flat records returned by a generic
//! "list records" call of the host web-application framework. This module
//! defines that call as the [`RecordSource`] trait, so the dashboard can be
//! driven either by the live backend ([`frappe::FrappeClient`]) or by fixture
//! data ([`fixture::FixtureSource`]) without touching the view-model builders.
//!
//! ## Features
//!
//! - **Query Description**: [`ListQuery`] carries doctype, fields, filters, ordering and limit
//! - **Filter Triples**: [`Filter`] serialises to the backend's `[field, op, value]` form
//! - **Typed Errors**: [`ApiError`] separates transport, status and decoding failures
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wadash::api::{FilterOp, ListQuery, RecordSource};
//! use wadash::api::fixture::FixtureSource;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let source = FixtureSource::from_file("fixtures.json")?;
//! let query = ListQuery::new("Warehouse Attendance Log")
//!     .fields(&["staff", "logtype", "creation"])
//!     .filter("staff", FilterOp::Eq, "WS-0001")
//!     .order_by("creation desc")
//!     .limit(50);
//! let records = source.get_list(&query).await?;
//! # Ok(())
//! # }
//! ```

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

pub mod fixture;
pub mod frappe;

pub use fixture::FixtureSource;
pub use frappe::FrappeClient;

/// Doctype holding one record per check-in or check-out.
pub const ATTENDANCE_LOG_DOCTYPE: &str = "Warehouse Attendance Log";

/// Doctype holding one record per employee per calendar day.
pub const DAILY_HOURS_DOCTYPE: &str = "Staff Daily Working Hours";

/// Errors raised while talking to a record source.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status code.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Fixture data could not be loaded.
    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Comparison operator of a list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    NotEq,
    Like,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl FilterOp {
    /// Operator token understood by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::NotEq => "!=",
            FilterOp::Like => "like",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// A single `(field, op, value)` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.field)?;
        seq.serialize_element(self.op.as_str())?;
        seq.serialize_element(&self.value)?;
        seq.end()
    }
}

/// Parameters of one list call.
///
/// Built with the chained setters; an empty `fields` list asks the source for
/// every field it has.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub doctype: String,
    pub fields: Vec<String>,
    pub filters: Vec<Filter>,
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new(doctype: &str) -> Self {
        Self {
            doctype: doctype.to_string(),
            fields: Vec::new(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(order_by.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Read access to the backend's generic record list.
///
/// Implementations return raw JSON objects; decoding into typed records is
/// left to [`crate::libs::records`] so that one bad record never discards the
/// whole batch. The returned future must be `Send` because refreshes run on
/// spawned tasks; implementors can still write `async fn get_list`.
pub trait RecordSource {
    /// Runs `query` and returns the matching records in backend order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the source cannot be reached or answers
    /// with something other than a list of records.
    fn get_list(&self, query: &ListQuery) -> impl Future<Output = Result<Vec<Value>, ApiError>> + Send;
}
