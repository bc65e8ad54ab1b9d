//! Engine transport
//!
//! The builder core never talks to the network itself; every terminal
//! operation hands a finished request document to an [`EsClient`]
//! implementation. Failures come back as a discriminated [`EsError`] rather
//! than a success/message string folded into one channel.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

mod memory;

pub use memory::InMemoryClient;

#[derive(Error, Debug)]
pub enum EsError {
    #[error("engine connection error: {0}")]
    Connection(String),
    #[error("engine request failed: {0}")]
    Backend(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Search-engine transport contract.
///
/// `create_index` and `search` receive complete request envelopes built by
/// the handler; the document operations receive their coordinates directly.
#[async_trait]
pub trait EsClient: Send + Sync {
    async fn index_exists(&self, index: &str) -> Result<bool, EsError>;
    async fn create_index(&self, request: &Value) -> Result<bool, EsError>;
    async fn delete_index(&self, index: &str, doc_type: &str) -> Result<bool, EsError>;
    async fn get_mapping(&self, index: &str) -> Result<Value, EsError>;

    async fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        id: Option<&str>,
        body: &Value,
    ) -> Result<bool, EsError>;
    async fn delete_document(&self, index: &str, doc_type: &str, id: &str)
        -> Result<bool, EsError>;
    async fn document_exists(&self, index: &str, doc_type: &str, id: &str)
        -> Result<bool, EsError>;
    async fn get_document(&self, index: &str, doc_type: &str, id: &str) -> Result<Value, EsError>;
    async fn update_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        partial: &Value,
    ) -> Result<bool, EsError>;

    async fn search(&self, request: &Value) -> Result<Value, EsError>;
}
