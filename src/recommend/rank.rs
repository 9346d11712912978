use std::cmp::Ordering;
use std::fmt::{self, Debug};

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::config::TAG_MARKER;
use crate::error::{Result, VectorizerError};
use crate::utils::math::vector::SparseVec;

/// Scored corpus documents, `(document index, similarity)`.
pub struct Hits {
    pub list: Vec<(usize, f64)>,
}

impl Hits {
    pub fn new(list: Vec<(usize, f64)>) -> Self {
        Hits { list }
    }

    /// Sort by descending score; equal scores keep document order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        self
    }

    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.list.iter().map(|&(idx, _)| idx)
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (idx, score) in &self.list {
                writeln!(f, "    doc {}: {:.6}", idx, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Prepends the tag marker unless the tag already starts with it.
pub fn with_marker(tag: &str) -> String {
    if tag.starts_with(TAG_MARKER) {
        tag.to_owned()
    } else {
        let mut marked = String::with_capacity(tag.len() + TAG_MARKER.len_utf8());
        marked.push(TAG_MARKER);
        marked.push_str(tag);
        marked
    }
}

/// Exhaustive nearest-neighbor ranking over the corpus matrix, with tag
/// aggregation over the nearest documents.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker<'a> {
    vectors: &'a [SparseVec<f64>],
    tags: &'a [Vec<String>],
    neighbors: usize,
}

impl<'a> SimilarityRanker<'a> {
    /// # Errors
    /// `NotInitialized` when there are no corpus vectors or no tag lists.
    pub fn new(vectors: &'a [SparseVec<f64>], tags: &'a [Vec<String>], neighbors: usize) -> Result<Self> {
        if vectors.is_empty() || tags.is_empty() {
            return Err(VectorizerError::NotInitialized);
        }
        Ok(Self { vectors, tags, neighbors })
    }

    /// Dot product of every (normalized) row with the (normalized) query,
    /// which equals cosine similarity.
    pub fn score(&self, query: &SparseVec<f64>) -> Hits {
        let list = self
            .vectors
            .par_iter()
            .enumerate()
            .map(|(idx, row)| (idx, row.dot(query)))
            .collect();
        Hits::new(list)
    }

    /// Top `min(neighbors, corpus size)` documents by descending similarity.
    pub fn nearest(&self, query: &SparseVec<f64>) -> Hits {
        let k = self.neighbors.min(self.vectors.len());
        let mut hits = self.score(query);
        hits.sort_by_score().truncate(k);
        hits
    }

    /// Tags of the nearest documents, counted and ranked, at most `n` entries.
    pub fn rank(&self, query: &SparseVec<f64>, n: usize) -> IndexMap<String, u32> {
        let nearest = self.nearest(query);
        tracing::debug!(hits = ?nearest, "nearest documents");
        aggregate_tags(&nearest, self.tags, n)
    }
}

/// Counts tags over `nearest`, falling back to the first `n` tags of each
/// document with count 1 when nothing was counted, then keeps the top `n`
/// by descending count (ties in first-seen order).
pub fn aggregate_tags(nearest: &Hits, tags: &[Vec<String>], n: usize) -> IndexMap<String, u32> {
    let mut counts: IndexMap<String, u32> = IndexMap::new();
    for idx in nearest.indices() {
        let Some(doc_tags) = tags.get(idx) else { continue };
        for tag in doc_tags {
            *counts.entry(with_marker(tag)).or_insert(0) += 1;
        }
    }

    if counts.is_empty() {
        for idx in nearest.indices() {
            let Some(doc_tags) = tags.get(idx) else { continue };
            for tag in doc_tags.iter().take(n) {
                counts.insert(with_marker(tag), 1);
            }
        }
    }

    // stable: equal counts stay in insertion order
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts.truncate(n);
    counts
}
