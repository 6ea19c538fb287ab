//! Elasticsearch-compatible store backend
//!
//! Speaks the document API of an Elasticsearch-style store over HTTP:
//! `POST /{index}/_doc`, `GET /{index}/_doc/{id}`,
//! `POST /{index}/_update/{id}`, `DELETE /{index}/_doc/{id}` and
//! `POST /{index}/_search`.
//!
//! The store indexes writes asynchronously: a 2xx on a write does not
//! mean the document is visible to subsequent reads or searches. This
//! backend reports exactly what the store said and leaves visibility
//! handling to the coordinator.

use crate::{DeleteOutcome, DocumentIndex, UpdateOutcome};
use async_trait::async_trait;
use docstore_common::{Document, DocumentFields, DocumentPatch, Error, Result, StoreConfig};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Result strings the store reports on write operations
const RESULT_DELETED: &str = "deleted";
const RESULT_UPDATED: &str = "updated";
const RESULT_NOOP: &str = "noop";

/// Store response to indexing a new document
#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

/// Store response to fetching a document by id
#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    found: bool,
    #[serde(rename = "_source")]
    source: Option<DocumentFields>,
}

/// Store response to update/delete; `result` carries the outcome
#[derive(Debug, Deserialize)]
struct WriteResponse {
    result: String,
}

/// Partial-update request body: `{"doc": {...}}`
#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    doc: &'a DocumentPatch,
}

/// Match-all search request body
#[derive(Debug, Serialize)]
struct SearchRequest {
    query: serde_json::Value,
}

impl SearchRequest {
    fn match_all() -> Self {
        Self {
            query: serde_json::json!({ "match_all": {} }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: DocumentFields,
}

/// HTTP client for an Elasticsearch-compatible document store
pub struct EsIndex {
    config: StoreConfig,
    http_client: reqwest::Client,
}

impl EsIndex {
    /// Create a new store client.
    ///
    /// The underlying connection pool is built once and shared by all
    /// requests; the per-request timeout comes from the config.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// The index name this client writes to
    pub fn index_name(&self) -> &str {
        &self.config.index
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/_doc/{id}", self.config.endpoint, self.config.index)
    }

    /// Map a transport-level failure into the local taxonomy
    fn transport_error(e: &reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_connect() {
            Error::ConnectionFailed(e.to_string())
        } else {
            Error::ServiceUnavailable(e.to_string())
        }
    }

    /// Turn an unexpected (non-2xx, non-domain-404) response into an error
    async fn unexpected_status(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Error::ServiceUnavailable(format!("store returned status {status}: {body}"))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[async_trait]
impl DocumentIndex for EsIndex {
    async fn index(&self, fields: &DocumentFields) -> Result<String> {
        let url = format!("{}/{}/_doc", self.config.endpoint, self.config.index);

        let response = self
            .http_client
            .post(&url)
            .json(fields)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::unexpected_status(response).await);
        }

        let indexed: IndexResponse = Self::decode(response).await?;
        debug!(id = %indexed.id, "indexed document");
        Ok(indexed.id)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        let response = self
            .http_client
            .get(self.doc_url(id))
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        // A missing id is a domain outcome, not a fault
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::unexpected_status(response).await);
        }

        let fetched: GetResponse = Self::decode(response).await?;
        match (fetched.found, fetched.source) {
            (true, Some(source)) => Ok(Some(Document::from_fields(fetched.id, source))),
            _ => Ok(None),
        }
    }

    async fn update(&self, id: &str, patch: &DocumentPatch) -> Result<UpdateOutcome> {
        let url = format!(
            "{}/{}/_update/{id}",
            self.config.endpoint, self.config.index
        );

        let response = self
            .http_client
            .post(&url)
            .json(&UpdateRequest { doc: patch })
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(UpdateOutcome::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::unexpected_status(response).await);
        }

        // The store reports "noop" when the patch matches the stored
        // values; the update is still applied from the caller's view.
        let written: WriteResponse = Self::decode(response).await?;
        match written.result.as_str() {
            RESULT_UPDATED | RESULT_NOOP => Ok(UpdateOutcome::Updated),
            _ => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let response = self
            .http_client
            .delete(self.doc_url(id))
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::unexpected_status(response).await);
        }

        // A store that silently no-ops on a missing id still reports
        // the outcome here; check it rather than trusting the 2xx.
        let written: WriteResponse = Self::decode(response).await?;
        if written.result == RESULT_DELETED {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn search_all(&self) -> Result<Vec<Document>> {
        let url = format!("{}/{}/_search", self.config.endpoint, self.config.index);

        let response = self
            .http_client
            .post(&url)
            .json(&SearchRequest::match_all())
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::unexpected_status(response).await);
        }

        let results: SearchResponse = Self::decode(response).await?;
        Ok(results
            .hits
            .hits
            .into_iter()
            .map(|hit| Document::from_fields(hit.id, hit.source))
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.config.endpoint)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_index_response() {
        let body = r#"{"_index":"documents","_id":"kP3aXYQB","result":"created"}"#;
        let parsed: IndexResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id, "kP3aXYQB");
    }

    #[test]
    fn test_decode_get_response() {
        let body = r#"{"_id":"kP3aXYQB","found":true,"_source":{"name":"Ann","email":"ann@ex.com"}}"#;
        let parsed: GetResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.found);
        assert_eq!(parsed.source.unwrap().name, "Ann");
    }

    #[test]
    fn test_decode_write_response() {
        let body = r#"{"_id":"kP3aXYQB","result":"not_found"}"#;
        let parsed: WriteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result, "not_found");
    }

    #[test]
    fn test_decode_search_response() {
        let body = r#"{"hits":{"total":{"value":1},"hits":[
            {"_id":"a1","_score":1.0,"_source":{"name":"Ann","email":"ann@ex.com"}}
        ]}}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.hits.hits.len(), 1);
        assert_eq!(parsed.hits.hits[0].id, "a1");
    }

    #[test]
    fn test_update_request_only_carries_present_fields() {
        let patch = DocumentPatch {
            name: Some("Bea".into()),
            email: None,
        };
        let body = serde_json::to_value(UpdateRequest { doc: &patch }).unwrap();
        assert_eq!(body, serde_json::json!({"doc": {"name": "Bea"}}));
    }

    #[test]
    fn test_match_all_query_shape() {
        let body = serde_json::to_value(SearchRequest::match_all()).unwrap();
        assert_eq!(body, serde_json::json!({"query": {"match_all": {}}}));
    }
}
