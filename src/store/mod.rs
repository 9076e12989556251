//! External vector-store seam: entry types and the collection capability trait.

mod chroma;

pub use chroma::{ChromaCollection, ChromaStore};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Key-value payload attached to an entry and returned alongside query matches.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// The persisted unit handed to the external vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Opaque unique identifier, generated fresh per entry and never reused.
    pub id: String,
    /// Searchable text the store scores similarity against.
    pub document: String,
    /// Payload returned alongside query matches.
    pub metadata: Metadata,
}

/// Capability set required of an external vector-store collection.
///
/// Indexing, embedding, and the similarity metric all live behind this
/// boundary; implementations only relay the store's own answers.
pub trait VectorCollection {
    /// Current number of entries in the collection.
    fn count(&self) -> Result<usize>;

    /// Adds entries to the collection.
    fn add(&self, entries: &[CollectionEntry]) -> Result<()>;

    /// Returns up to `n_results` metadata matches per query text, outer
    /// index aligned to `texts` order, best match first.
    fn query(&self, texts: &[String], n_results: usize) -> Result<Vec<Vec<Metadata>>>;
}

impl<C: VectorCollection + ?Sized> VectorCollection for &C {
    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn add(&self, entries: &[CollectionEntry]) -> Result<()> {
        (**self).add(entries)
    }

    fn query(&self, texts: &[String], n_results: usize) -> Result<Vec<Vec<Metadata>>> {
        (**self).query(texts, n_results)
    }
}
