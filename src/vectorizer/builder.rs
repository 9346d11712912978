use std::marker::PhantomData;

use rayon::prelude::*;

use crate::utils::math::vector::SparseVec;
use crate::vectorizer::bm25::{Bm25Engine, WeightingEngine};
use crate::vectorizer::context::ContextWeighter;
use crate::vectorizer::corpus::CorpusModel;
use crate::vectorizer::feature::FeatureExtractor;
use crate::vectorizer::token::TermFrequency;

/// Turns documents into L2-normalized vectors over a fitted vocabulary.
///
/// Per feature present in both the document and the vocabulary:
/// `weight = tf_bm25 * (1 + mean(context)) * idf`, where the context factor
/// only applies to features that are themselves a token of the document.
/// Features outside the vocabulary are dropped.
#[derive(Debug, Clone)]
pub struct DocumentVectorBuilder<'a, E = Bm25Engine>
where
    E: WeightingEngine + Send + Sync,
{
    model: &'a CorpusModel,
    extractor: FeatureExtractor,
    weighter: ContextWeighter,
    _marker: PhantomData<E>,
}

impl<'a, E> DocumentVectorBuilder<'a, E>
where
    E: WeightingEngine + Send + Sync,
{
    pub fn new(model: &'a CorpusModel) -> Self {
        let config = model.config();
        Self {
            model,
            extractor: FeatureExtractor::from_config(config),
            weighter: ContextWeighter::new(config.window_size),
            _marker: PhantomData,
        }
    }

    pub fn build(&self, text: &str) -> SparseVec<f64> {
        let analysis = self.extractor.analyze(text);
        let doc_len = analysis.tokens.len() as f64;
        let mut freq = TermFrequency::new();
        freq.add_terms(&analysis.features);
        let context = self.weighter.weigh(&analysis.tokens);

        let config = self.model.config();
        let avg_doc_len = self.model.avg_doc_len();
        let idf = self.model.idf();

        let mut inds = Vec::with_capacity(freq.len());
        let mut vals = Vec::with_capacity(freq.len());
        for (feature, count) in freq.iter() {
            let Some(index) = self.model.index_of(feature) else {
                continue;
            };
            let mut tf = E::tf(count as f64, doc_len, avg_doc_len, config);
            if let Some(mean) = context.mean(feature) {
                tf = E::context_boost(tf, mean);
            }
            inds.push(index as u32);
            vals.push(tf * idf[index]);
        }

        SparseVec::from_entries(self.model.vocab_size(), inds, vals).normalized()
    }

    /// One row per document, in input order.
    pub fn build_batch<T>(&self, documents: &[T]) -> Vec<SparseVec<f64>>
    where
        T: AsRef<str> + Sync,
    {
        documents.par_iter().map(|doc| self.build(doc.as_ref())).collect()
    }
}
