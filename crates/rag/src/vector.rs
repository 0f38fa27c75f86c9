//! External vector index interface.
//!
//! The engine does not implement semantic search itself; it consumes a
//! vector index as an external capability behind the `VectorIndex` trait.
//! The bundled implementation speaks the Pinecone REST query API.

use crate::types::Category;
use lexrag_core::{AppError, AppResult, Settings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// One match returned by the index.
#[derive(Debug, Clone)]
pub struct IndexMatch {
    pub score: f32,
    pub text: String,
    pub law: String,
    pub article: String,
}

/// Consumed capability: semantic search over an external index.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Query the index with an embedding vector, optionally filtered by
    /// category. The vector dimension must match the index's.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        category: Option<Category>,
    ) -> AppResult<Vec<IndexMatch>>;
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    score: f32,
    #[serde(default)]
    metadata: serde_json::Value,
}

/// Pinecone-backed vector index.
pub struct PineconeIndex {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

impl PineconeIndex {
    /// Create an index client for the given host and API key.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let host = host.into();
        let endpoint = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("https://{}", host)
        };

        Self {
            endpoint,
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Build an index client from settings, if one is configured.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        match (&settings.pinecone_index_host, &settings.pinecone_api_key) {
            (Some(host), Some(key)) => Some(Self::new(host.clone(), key.clone())),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        category: Option<Category>,
    ) -> AppResult<Vec<IndexMatch>> {
        let filter = category.map(|c| serde_json::json!({ "category": c.as_str() }));

        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            filter,
        };

        let url = format!("{}/query", self.endpoint);
        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .timeout(QUERY_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("pinecone: request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Index(format!(
                "pinecone API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Index(format!("pinecone: failed to parse response: {}", e)))?;

        Ok(parsed.matches.into_iter().map(convert_match).collect())
    }
}

/// Convert a wire match, treating metadata as an untrusted document.
fn convert_match(m: WireMatch) -> IndexMatch {
    let get = |key: &str| -> Option<String> {
        m.metadata
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    IndexMatch {
        score: m.score,
        text: get("texto").unwrap_or_default(),
        law: get("ley").unwrap_or_else(|| "Documento".to_string()),
        article: get("articulo").unwrap_or_default(),
    }
}
