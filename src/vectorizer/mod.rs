pub mod bm25;
pub mod builder;
pub mod context;
pub mod corpus;
pub mod feature;
pub mod serde;
pub mod token;

use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::VectorizerConfig;
use crate::error::{Result, VectorizerError};
use crate::utils::math::vector::SparseVec;
use crate::vectorizer::bm25::{Bm25Engine, WeightingEngine};
use crate::vectorizer::builder::DocumentVectorBuilder;
use crate::vectorizer::corpus::CorpusModel;

/// Fit / transform front end over a shared `CorpusModel`.
///
/// The model sits behind an `Arc`: `fit` builds a fresh model and swaps the
/// reference, so callers holding the previous `Arc` keep a consistent view.
#[derive(Debug, Clone)]
pub struct Vectorizer<E = Bm25Engine>
where
    E: WeightingEngine + Send + Sync,
{
    config: VectorizerConfig,
    model: Option<Arc<CorpusModel>>,
    _marker: PhantomData<E>,
}

impl<E> Default for Vectorizer<E>
where
    E: WeightingEngine + Send + Sync,
{
    fn default() -> Self {
        Self {
            config: VectorizerConfig::default(),
            model: None,
            _marker: PhantomData,
        }
    }
}

impl<E> Vectorizer<E>
where
    E: WeightingEngine + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: None,
            _marker: PhantomData,
        })
    }

    /// Wraps an already fitted model, e.g. one restored from a cache.
    pub fn from_model(model: Arc<CorpusModel>) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            config: *model.config(),
            model: Some(model),
            _marker: PhantomData,
        })
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn model(&self) -> Option<&Arc<CorpusModel>> {
        self.model.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Builds vocabulary, IDF table and average length from `documents`,
    /// replacing any previous model wholesale.
    pub fn fit<T>(&mut self, documents: &[T]) -> Result<()>
    where
        T: AsRef<str> + Sync,
    {
        let model = CorpusModel::fit::<E, T>(documents, self.config)?;
        self.model = Some(Arc::new(model));
        Ok(())
    }

    /// One normalized sparse row per document.
    pub fn transform<T>(&self, documents: &[T]) -> Result<Vec<SparseVec<f64>>>
    where
        T: AsRef<str> + Sync,
    {
        let builder = self.builder()?;
        Ok(builder.build_batch(documents))
    }

    /// `documents.len() x vocab_size` dense matrix.
    pub fn transform_dense<T>(&self, documents: &[T]) -> Result<Vec<Vec<f64>>>
    where
        T: AsRef<str> + Sync,
    {
        Ok(self
            .transform(documents)?
            .iter()
            .map(SparseVec::to_dense)
            .collect())
    }

    pub fn transform_one(&self, text: &str) -> Result<SparseVec<f64>> {
        Ok(self.builder()?.build(text))
    }

    pub fn fit_transform<T>(&mut self, documents: &[T]) -> Result<Vec<SparseVec<f64>>>
    where
        T: AsRef<str> + Sync,
    {
        self.fit(documents)?;
        self.transform(documents)
    }

    fn builder(&self) -> Result<DocumentVectorBuilder<'_, E>> {
        let model = self.model.as_deref().ok_or(VectorizerError::NotFitted)?;
        Ok(DocumentVectorBuilder::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_before_fit_fails() {
        let vectorizer: Vectorizer = Vectorizer::new();
        assert!(matches!(vectorizer.transform(&["hello"]), Err(VectorizerError::NotFitted)));
        assert!(matches!(vectorizer.transform_one("hello"), Err(VectorizerError::NotFitted)));
    }

    #[test]
    fn fit_on_empty_corpus_fails() {
        let mut vectorizer: Vectorizer = Vectorizer::new();
        let docs: Vec<String> = Vec::new();
        assert!(matches!(vectorizer.fit(&docs), Err(VectorizerError::EmptyCorpus)));
        assert!(!vectorizer.is_fitted());
    }

    #[test]
    fn dense_matrix_shape() {
        let docs = ["cat sat on mat", "dog sat on rug"];
        let mut vectorizer: Vectorizer = Vectorizer::new();
        vectorizer.fit(&docs).unwrap();
        let matrix = vectorizer.transform_dense(&["cat", "dog", "bird"]).unwrap();
        assert_eq!(matrix.len(), 3);
        assert!(matrix.iter().all(|row| row.len() == 15));
        assert!(matrix[2].iter().all(|&v| v == 0.0));
        let norm: f64 = matrix[0].iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn refit_swaps_model_without_touching_old_handle() {
        let mut vectorizer: Vectorizer = Vectorizer::new();
        vectorizer.fit(&["alpha beta"]).unwrap();
        let old = Arc::clone(vectorizer.model().unwrap());
        vectorizer.fit(&["gamma delta epsilon", "zeta"]).unwrap();
        let new = vectorizer.model().unwrap();
        assert!(!Arc::ptr_eq(&old, new));
        assert!(old.index_of("alpha").is_some());
        assert!(new.index_of("alpha").is_none());
        assert_eq!(old.doc_num(), 1);
        assert_eq!(new.doc_num(), 2);
    }

    #[test]
    fn fitting_twice_is_bit_identical() {
        let docs = ["Rust is fast", "Rust is safe, and fast!", "Python is friendly"];
        let mut a: Vectorizer = Vectorizer::new();
        let mut b: Vectorizer = Vectorizer::new();
        let rows_a = a.fit_transform(&docs).unwrap();
        let rows_b = b.fit_transform(&docs).unwrap();
        assert_eq!(a.model().unwrap(), b.model().unwrap());
        assert_eq!(rows_a, rows_b);
    }
}
