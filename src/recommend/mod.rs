pub mod rank;

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cache::SnapshotCache;
use crate::config::{RecommenderConfig, VectorizerConfig};
use crate::error::{Result, VectorizerError};
use crate::loader::{load_corpus, LabeledCorpus};
use crate::recommend::rank::SimilarityRanker;
use crate::utils::math::vector::SparseVec;
use crate::vectorizer::bm25::{Bm25Engine, WeightingEngine};
use crate::vectorizer::builder::DocumentVectorBuilder;
use crate::vectorizer::corpus::CorpusModel;

/// Everything one fit produces: the corpus model, one normalized row per
/// document and the tag list of each document, positionally aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderSnapshot {
    pub model: CorpusModel,
    pub vectors: Vec<SparseVec<f64>>,
    pub tags: Vec<Vec<String>>,
}

impl RecommenderSnapshot {
    /// Fits the model on `texts` and vectorizes the same texts.
    pub fn build<E, T>(texts: &[T], tags: Vec<Vec<String>>, config: VectorizerConfig) -> Result<Self>
    where
        E: WeightingEngine + Send + Sync,
        T: AsRef<str> + Sync,
    {
        if texts.len() != tags.len() {
            return Err(VectorizerError::LengthMismatch {
                texts: texts.len(),
                tags: tags.len(),
            });
        }
        let model = CorpusModel::fit::<E, T>(texts, config)?;
        let vectors = DocumentVectorBuilder::<E>::new(&model).build_batch(texts);
        Ok(Self { model, vectors, tags })
    }

    pub fn doc_num(&self) -> usize {
        self.vectors.len()
    }

    /// Shape checks for snapshots that did not come out of `build`.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if self.tags.len() != self.vectors.len() {
            return Err(VectorizerError::CorruptCache(format!(
                "{} tag lists for {} vectors",
                self.tags.len(),
                self.vectors.len()
            )));
        }
        if self.vectors.len() as u64 != self.model.doc_num() {
            return Err(VectorizerError::CorruptCache(format!(
                "{} vectors for a model fitted on {} documents",
                self.vectors.len(),
                self.model.doc_num()
            )));
        }
        let vocab_size = self.model.vocab_size();
        if let Some(bad) = self.vectors.iter().position(|v| v.len() != vocab_size) {
            return Err(VectorizerError::CorruptCache(format!(
                "vector {bad} has length {}, vocabulary has {vocab_size}",
                self.vectors[bad].len()
            )));
        }
        Ok(())
    }
}

/// Recommends hashtags for a text from the tags of its nearest corpus documents.
///
/// The fitted state is one `Arc<RecommenderSnapshot>`. Refitting or restoring
/// swaps in a new snapshot; anyone holding the old `Arc` keeps reading it.
#[derive(Debug, Clone)]
pub struct HashtagRecommender<E = Bm25Engine>
where
    E: WeightingEngine + Send + Sync,
{
    vectorizer_config: VectorizerConfig,
    config: RecommenderConfig,
    snapshot: Option<Arc<RecommenderSnapshot>>,
    _marker: PhantomData<E>,
}

impl<E> Default for HashtagRecommender<E>
where
    E: WeightingEngine + Send + Sync,
{
    fn default() -> Self {
        Self {
            vectorizer_config: VectorizerConfig::default(),
            config: RecommenderConfig::default(),
            snapshot: None,
            _marker: PhantomData,
        }
    }
}

impl<E> HashtagRecommender<E>
where
    E: WeightingEngine + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(vectorizer_config: VectorizerConfig, config: RecommenderConfig) -> Result<Self> {
        vectorizer_config.validate()?;
        Ok(Self {
            vectorizer_config,
            config,
            snapshot: None,
            _marker: PhantomData,
        })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Option<&Arc<RecommenderSnapshot>> {
        self.snapshot.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Fits on `texts` and replaces the current snapshot.
    pub fn fit<T>(&mut self, texts: &[T], tags: Vec<Vec<String>>) -> Result<()>
    where
        T: AsRef<str> + Sync,
    {
        let snapshot = RecommenderSnapshot::build::<E, T>(texts, tags, self.vectorizer_config)?;
        self.snapshot = Some(Arc::new(snapshot));
        Ok(())
    }

    pub fn fit_corpus(&mut self, corpus: LabeledCorpus) -> Result<()> {
        self.fit(&corpus.texts, corpus.tags)
    }

    /// Installs a snapshot produced elsewhere (typically read from a cache).
    pub fn restore(&mut self, snapshot: RecommenderSnapshot) -> Result<()> {
        snapshot.validate()?;
        self.snapshot = Some(Arc::new(snapshot));
        Ok(())
    }

    /// Uses the cached snapshot when there is no topic and the cache holds one;
    /// otherwise loads the corpus from `data_dir`, fits, and writes the cache.
    pub fn initialize(
        &mut self,
        data_dir: impl AsRef<Path>,
        cache: Option<&SnapshotCache>,
        topic: Option<&str>,
    ) -> Result<()> {
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());
        if let (Some(cache), None) = (cache, topic) {
            match cache.load() {
                Ok(Some(snapshot)) => return self.restore(snapshot),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable cache, refitting"),
            }
        }

        let corpus = load_corpus(data_dir, topic)?;
        self.fit_corpus(corpus)?;
        if let (Some(cache), Some(snapshot)) = (cache, self.snapshot.as_deref()) {
            cache.save(snapshot)?;
        }
        Ok(())
    }

    /// Top `n` tags with their neighbor counts, in descending count order.
    ///
    /// # Errors
    /// `NotInitialized` when nothing has been fitted or restored yet.
    pub fn recommend(&self, text: &str, n: usize) -> Result<IndexMap<String, u32>> {
        let snapshot = self.snapshot.as_deref().ok_or(VectorizerError::NotInitialized)?;
        let ranker = SimilarityRanker::new(&snapshot.vectors, &snapshot.tags, self.config.neighbors)?;
        let query = DocumentVectorBuilder::<E>::new(&snapshot.model).build(text);
        tracing::debug!(nnz = query.nnz(), n, "vectorized query");
        Ok(ranker.rank(&query, n))
    }

    /// `recommend` with the configured default `n`.
    pub fn recommend_default(&self, text: &str) -> Result<IndexMap<String, u32>> {
        self.recommend(text, self.config.default_n)
    }
}
