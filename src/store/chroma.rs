//! Blocking client for a Chroma-compatible vector-store HTTP API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CollectionEntry, Metadata, VectorCollection};

/// Blocking client that talks to a Chroma-compatible vector-store server.
#[derive(Clone)]
pub struct ChromaStore {
    client: Client,
    base_url: String,
}

impl ChromaStore {
    /// Builds a new store client.
    ///
    /// # Arguments
    /// * `base_url` - Server root, e.g. `http://127.0.0.1:8000`
    /// * `api_key` - Optional value for the `x-chroma-token` header
    /// * `timeout` - Per-request timeout enforced by the HTTP client
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "vector store URL must be an http(s) URL"
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            anyhow::ensure!(!key.trim().is_empty(), "vector store API key is empty");
            headers.insert(
                "x-chroma-token",
                HeaderValue::from_str(key.trim()).context("invalid vector store API key")?,
            );
        }
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build vector store HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Opens the named collection, creating it on the server when absent.
    pub fn get_or_create_collection(&self, name: &str) -> Result<ChromaCollection> {
        anyhow::ensure!(!name.trim().is_empty(), "collection name is required");
        let url = format!("{}/api/v1/collections", self.base_url);
        let request = CreateCollectionRequest {
            name: name.trim(),
            get_or_create: true,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .with_context(|| format!("failed to reach vector store at {}", self.base_url))?;
        let info: CollectionInfo = read_json(response)
            .with_context(|| format!("failed to open collection '{}'", name))?;
        crate::debug_log!("opened collection '{}' as {}", name, info.id);
        Ok(ChromaCollection {
            client: self.client.clone(),
            collection_url: format!("{}/api/v1/collections/{}", self.base_url, info.id),
        })
    }
}

/// Handle to one server-side collection.
#[derive(Clone)]
pub struct ChromaCollection {
    client: Client,
    collection_url: String,
}

impl VectorCollection for ChromaCollection {
    fn count(&self) -> Result<usize> {
        let url = format!("{}/count", self.collection_url);
        let response = self
            .client
            .get(&url)
            .send()
            .context("failed to request collection count")?;
        read_json(response).context("failed to parse collection count")
    }

    fn add(&self, entries: &[CollectionEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        crate::debug_log!("adding {} entries to {}", entries.len(), self.collection_url);
        let request = AddRequest {
            ids: entries.iter().map(|entry| entry.id.as_str()).collect(),
            documents: entries.iter().map(|entry| entry.document.as_str()).collect(),
            metadatas: entries.iter().map(|entry| &entry.metadata).collect(),
        };
        let url = format!("{}/add", self.collection_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .context("failed to send add request")?;
        ensure_success(response).context("vector store rejected add request")?;
        Ok(())
    }

    fn query(&self, texts: &[String], n_results: usize) -> Result<Vec<Vec<Metadata>>> {
        let request = QueryRequest {
            query_texts: texts,
            n_results,
            include: &["metadatas"],
        };
        let url = format!("{}/query", self.collection_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .context("failed to send query request")?;
        let parsed: QueryResponse =
            read_json(response).context("failed to parse query response")?;
        Ok(parsed
            .metadatas
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|metadata| metadata.unwrap_or_default())
                    .collect()
            })
            .collect())
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    anyhow::bail!("vector store returned {}: {}", status, body)
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response)?;
    response.json().map_err(Into::into)
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: Vec<&'a str>,
    documents: Vec<&'a str>,
    metadatas: Vec<&'a Metadata>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_texts: &'a [String],
    n_results: usize,
    include: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    metadatas: Vec<Vec<Option<Metadata>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store() -> ChromaStore {
        ChromaStore::new(
            "http://127.0.0.1:8000/".to_string(),
            None,
            Duration::from_secs(5),
        )
        .expect("build store client")
    }

    #[test]
    fn rejects_non_http_urls() {
        let result = ChromaStore::new(
            "ftp://127.0.0.1:8000".to_string(),
            None,
            Duration::from_secs(5),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_blank_api_key() {
        let result = ChromaStore::new(
            "http://127.0.0.1:8000".to_string(),
            Some("   ".to_string()),
            Duration::from_secs(5),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_blank_collection_name() {
        let result = store().get_or_create_collection("  ");
        assert!(result.is_err());
    }

    #[test]
    fn add_request_serializes_chroma_shape() {
        let mut metadata = Metadata::new();
        metadata.insert("links".to_string(), json!("http://a"));
        let entries = vec![CollectionEntry {
            id: "id-1".to_string(),
            document: "Python, Flask".to_string(),
            metadata,
        }];
        let request = AddRequest {
            ids: entries.iter().map(|entry| entry.id.as_str()).collect(),
            documents: entries.iter().map(|entry| entry.document.as_str()).collect(),
            metadatas: entries.iter().map(|entry| &entry.metadata).collect(),
        };

        let value = serde_json::to_value(&request).expect("serialize add request");

        assert_eq!(
            value,
            json!({
                "ids": ["id-1"],
                "documents": ["Python, Flask"],
                "metadatas": [{"links": "http://a"}],
            })
        );
    }

    #[test]
    fn query_request_asks_for_metadata_only() {
        let texts = vec!["Python".to_string()];
        let request = QueryRequest {
            query_texts: &texts,
            n_results: 2,
            include: &["metadatas"],
        };

        let value = serde_json::to_value(&request).expect("serialize query request");

        assert_eq!(
            value,
            json!({
                "query_texts": ["Python"],
                "n_results": 2,
                "include": ["metadatas"],
            })
        );
    }

    #[test]
    fn query_response_parses_metadata_groups() {
        let body = json!({
            "ids": [["a", "b"], ["c"]],
            "metadatas": [[{"links": "http://a"}, null], [{"links": "http://b"}]],
        });

        let parsed: QueryResponse =
            serde_json::from_value(body).expect("parse query response");

        assert_eq!(parsed.metadatas.len(), 2);
        assert_eq!(
            parsed.metadatas[0][0]
                .as_ref()
                .and_then(|m| m.get("links"))
                .and_then(|v| v.as_str()),
            Some("http://a")
        );
        assert!(parsed.metadatas[0][1].is_none());
    }

    #[test]
    fn response_without_metadatas_parses_empty() {
        let parsed: QueryResponse =
            serde_json::from_value(json!({"ids": []})).expect("parse query response");
        assert!(parsed.metadatas.is_empty());
    }
}
