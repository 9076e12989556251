//! Once-only collection loading and top-k link retrieval.

use uuid::Uuid;

use crate::dataset::PortfolioDataset;
use crate::store::{CollectionEntry, Metadata, VectorCollection};

/// Matches requested per query skill.
const TOP_LINKS: usize = 2;

/// Metadata key carrying the link payload of an entry.
pub const LINKS_KEY: &str = "links";

/// Skill input accepted by [`PortfolioIndex::query_links`].
///
/// The two shapes callers pass are spelled out as variants; a lone string
/// is promoted to a one-element batch when converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillQuery {
    /// A single skill string.
    One(String),
    /// A batch of skill strings queried together.
    Many(Vec<String>),
}

impl SkillQuery {
    fn into_texts(self) -> Vec<String> {
        match self {
            SkillQuery::One(skill) => vec![skill],
            SkillQuery::Many(skills) => skills,
        }
    }
}

impl From<&str> for SkillQuery {
    fn from(skill: &str) -> Self {
        SkillQuery::One(skill.to_string())
    }
}

impl From<String> for SkillQuery {
    fn from(skill: String) -> Self {
        SkillQuery::One(skill)
    }
}

impl From<Vec<String>> for SkillQuery {
    fn from(skills: Vec<String>) -> Self {
        SkillQuery::Many(skills)
    }
}

impl From<&[&str]> for SkillQuery {
    fn from(skills: &[&str]) -> Self {
        SkillQuery::Many(skills.iter().map(|skill| skill.to_string()).collect())
    }
}

/// Facade that loads portfolio rows into a vector collection and retrieves
/// the best-matching links per skill.
///
/// Nothing escapes `load` or `query_links` as a raised failure: every error
/// path is reported to the diagnostic stream and converted into a no-op or
/// an empty result.
pub struct PortfolioIndex<C> {
    dataset: PortfolioDataset,
    collection: C,
}

impl<C: VectorCollection> PortfolioIndex<C> {
    /// Builds an index over an already-opened collection handle.
    pub fn new(dataset: PortfolioDataset, collection: C) -> Self {
        Self {
            dataset,
            collection,
        }
    }

    /// Populates the collection with one entry per valid dataset row.
    ///
    /// A collection that already reports a non-zero entry count is left
    /// untouched; the count probe is the sole idempotency guard. Rows
    /// missing `Techstack` or `Links` are skipped with an indexed warning,
    /// and no row failure aborts the pass.
    pub fn load(&mut self) {
        match self.collection.count() {
            Ok(0) => {}
            Ok(_) => {
                eprintln!("portfolio already loaded (collection is not empty).");
                return;
            }
            Err(err) => {
                eprintln!("warning: could not check the portfolio collection count: {err:#}");
                return;
            }
        }

        eprintln!("loading portfolio into the vector store...");
        let mut added = 0usize;
        let mut skipped = 0usize;
        for (row, record) in self.dataset.take_records().into_iter().enumerate() {
            let (Some(techstack), Some(links)) = (record.techstack, record.links) else {
                eprintln!("warning: row {row} is missing Techstack or Links; skipping.");
                skipped += 1;
                continue;
            };
            let mut metadata = Metadata::new();
            metadata.insert(LINKS_KEY.to_string(), links.into());
            let entry = CollectionEntry {
                id: Uuid::new_v4().to_string(),
                document: techstack,
                metadata,
            };
            if let Err(err) = self.collection.add(std::slice::from_ref(&entry)) {
                eprintln!("warning: failed to add portfolio row {row}: {err:#}");
                continue;
            }
            added += 1;
        }
        eprintln!("portfolio load complete: {added} entries added, {skipped} rows skipped.");
    }

    /// Returns up to two best-matching metadata records per query skill.
    ///
    /// Groups come back in input order. An empty skill batch and any store
    /// failure both yield an empty result, with a warning on the diagnostic
    /// stream; the empty batch never reaches the store.
    pub fn query_links<Q: Into<SkillQuery>>(&self, skills: Q) -> Vec<Vec<Metadata>> {
        let texts = skills.into().into_texts();
        if texts.is_empty() {
            eprintln!("warning: no skills provided for the portfolio query; returning no links.");
            return Vec::new();
        }
        match self.collection.query(&texts, TOP_LINKS) {
            Ok(groups) => groups,
            Err(err) => {
                eprintln!("warning: portfolio query failed: {err:#}");
                Vec::new()
            }
        }
    }
}
