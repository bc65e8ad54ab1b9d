use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::{EsClient, EsError};

/// In-memory engine double for tests and local development.
///
/// Stores documents keyed `index/type/id` and records every create-index and
/// search request it receives so produced envelopes can be asserted.
pub struct InMemoryClient {
    docs: DashMap<String, Value>,
    indexes: DashMap<String, Value>,
    next_id: AtomicU64,
    create_requests: Mutex<Vec<Value>>,
    search_requests: Mutex<Vec<Value>>,
}

impl InMemoryClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            indexes: DashMap::new(),
            next_id: AtomicU64::new(1),
            create_requests: Mutex::new(Vec::new()),
            search_requests: Mutex::new(Vec::new()),
        }
    }

    /// Get current document count
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Clear all documents and indexes
    pub fn clear(&self) {
        self.docs.clear();
        self.indexes.clear();
    }

    /// The most recent create-index request envelope
    #[must_use]
    pub fn last_create_index_request(&self) -> Option<Value> {
        self.create_requests.lock().last().cloned()
    }

    /// The most recent search request envelope
    #[must_use]
    pub fn last_search_request(&self) -> Option<Value> {
        self.search_requests.lock().last().cloned()
    }

    fn doc_key(index: &str, doc_type: &str, id: &str) -> String {
        format!("{index}/{doc_type}/{id}")
    }
}

impl Default for InMemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EsClient for InMemoryClient {
    async fn index_exists(&self, index: &str) -> Result<bool, EsError> {
        Ok(self.indexes.contains_key(index))
    }

    async fn create_index(&self, request: &Value) -> Result<bool, EsError> {
        self.create_requests.lock().push(request.clone());
        let name = request
            .get("index")
            .and_then(Value::as_str)
            .ok_or_else(|| EsError::Backend("create request missing index".into()))?;
        if self.indexes.contains_key(name) {
            return Err(EsError::Backend(format!("index {name} already exists")));
        }
        self.indexes.insert(name.to_string(), request.clone());
        Ok(true)
    }

    async fn delete_index(&self, index: &str, _doc_type: &str) -> Result<bool, EsError> {
        let removed = self.indexes.remove(index).is_some();
        let prefix = format!("{index}/");
        self.docs.retain(|key, _| !key.starts_with(&prefix));
        Ok(removed)
    }

    async fn get_mapping(&self, index: &str) -> Result<Value, EsError> {
        let entry = self
            .indexes
            .get(index)
            .ok_or_else(|| EsError::NotFound(format!("index {index}")))?;
        Ok(json!({ index: { "mappings": entry.value()["body"]["mappings"].clone() } }))
    }

    async fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        id: Option<&str>,
        body: &Value,
    ) -> Result<bool, EsError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
        };
        self.docs
            .insert(Self::doc_key(index, doc_type, &id), body.clone());
        Ok(true)
    }

    async fn delete_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<bool, EsError> {
        Ok(self.docs.remove(&Self::doc_key(index, doc_type, id)).is_some())
    }

    async fn document_exists(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<bool, EsError> {
        Ok(self.docs.contains_key(&Self::doc_key(index, doc_type, id)))
    }

    async fn get_document(&self, index: &str, doc_type: &str, id: &str) -> Result<Value, EsError> {
        let key = Self::doc_key(index, doc_type, id);
        let doc = self
            .docs
            .get(&key)
            .ok_or_else(|| EsError::NotFound(format!("document {key}")))?;
        Ok(json!({
            "_index": index,
            "_type": doc_type,
            "_id": id,
            "found": true,
            "_source": doc.value().clone(),
        }))
    }

    async fn update_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        partial: &Value,
    ) -> Result<bool, EsError> {
        let key = Self::doc_key(index, doc_type, id);
        let mut entry = self
            .docs
            .get_mut(&key)
            .ok_or_else(|| EsError::NotFound(format!("document {key}")))?;
        if let (Some(target), Some(changes)) = (
            entry.value_mut().as_object_mut(),
            partial.get("doc").and_then(Value::as_object),
        ) {
            for (field, value) in changes {
                target.insert(field.clone(), value.clone());
            }
        }
        Ok(true)
    }

    async fn search(&self, request: &Value) -> Result<Value, EsError> {
        self.search_requests.lock().push(request.clone());
        let index = request
            .get("index")
            .and_then(Value::as_str)
            .ok_or_else(|| EsError::Backend("search request missing index".into()))?;
        let from = request.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;
        let size = request
            .get("size")
            .and_then(Value::as_u64)
            .unwrap_or(u64::MAX) as usize;

        // query evaluation is the real engine's job; the double returns the
        // index's documents in key order
        let prefix = format!("{index}/");
        let mut matched: Vec<(String, Value)> = self
            .docs
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));

        let hits: Vec<Value> = matched
            .into_iter()
            .skip(from)
            .take(size)
            .map(|(key, source)| {
                let mut parts = key.splitn(3, '/');
                let (index, doc_type, id) = (
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                );
                json!({"_index": index, "_type": doc_type, "_id": id, "_source": source})
            })
            .collect();

        Ok(json!({"hits": {"total": hits.len(), "hits": hits}}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_client_is_empty() {
        let client = InMemoryClient::new();
        assert!(client.is_empty());
        assert_eq!(client.len(), 0);
    }

    #[tokio::test]
    async fn test_index_and_get_document() {
        let client = InMemoryClient::new();
        client
            .index_document("products", "doc", Some("1"), &json!({"title": "phone"}))
            .await
            .unwrap();

        let doc = client.get_document("products", "doc", "1").await.unwrap();
        assert_eq!(doc["_source"], json!({"title": "phone"}));
        assert_eq!(doc["_id"], json!("1"));
    }

    #[tokio::test]
    async fn test_get_missing_document_is_not_found() {
        let client = InMemoryClient::new();
        let err = client.get_document("products", "doc", "1").await.unwrap_err();
        assert!(matches!(err, EsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_document_exists_and_delete() {
        let client = InMemoryClient::new();
        client
            .index_document("products", "doc", Some("1"), &json!({"title": "phone"}))
            .await
            .unwrap();

        assert!(client.document_exists("products", "doc", "1").await.unwrap());
        assert!(client.delete_document("products", "doc", "1").await.unwrap());
        assert!(!client.document_exists("products", "doc", "1").await.unwrap());
        assert!(!client.delete_document("products", "doc", "1").await.unwrap());
    }

    #[tokio::test]
    async fn test_auto_ids_are_assigned() {
        let client = InMemoryClient::new();
        client
            .index_document("products", "doc", None, &json!({"n": 1}))
            .await
            .unwrap();
        client
            .index_document("products", "doc", None, &json!({"n": 2}))
            .await
            .unwrap();
        assert_eq!(client.len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_doc_fields() {
        let client = InMemoryClient::new();
        client
            .index_document("products", "doc", Some("1"), &json!({"title": "phone", "price": 10}))
            .await
            .unwrap();
        client
            .update_document("products", "doc", "1", &json!({"doc": {"price": 12}}))
            .await
            .unwrap();

        let doc = client.get_document("products", "doc", "1").await.unwrap();
        assert_eq!(doc["_source"], json!({"title": "phone", "price": 12}));
    }

    #[tokio::test]
    async fn test_create_index_twice_fails() {
        let client = InMemoryClient::new();
        let request = json!({"index": "products", "type": "doc", "body": {}});
        assert!(client.create_index(&request).await.unwrap());
        assert!(client.create_index(&request).await.is_err());
        assert!(client.index_exists("products").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_index_drops_documents() {
        let client = InMemoryClient::new();
        client
            .create_index(&json!({"index": "products", "type": "doc", "body": {}}))
            .await
            .unwrap();
        client
            .index_document("products", "doc", Some("1"), &json!({"n": 1}))
            .await
            .unwrap();

        assert!(client.delete_index("products", "doc").await.unwrap());
        assert!(!client.index_exists("products").await.unwrap());
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_search_records_request_and_pages() {
        let client = InMemoryClient::new();
        for id in 1..=5 {
            client
                .index_document("products", "doc", Some(&id.to_string()), &json!({"n": id}))
                .await
                .unwrap();
        }

        let request = json!({"index": "products", "type": "doc", "size": 2, "from": 1, "body": {}});
        let response = client.search(&request).await.unwrap();

        assert_eq!(response["hits"]["hits"].as_array().unwrap().len(), 2);
        assert_eq!(client.last_search_request(), Some(request));
    }
}
