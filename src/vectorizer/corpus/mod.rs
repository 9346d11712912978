use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::{Result, VectorizerError};
use crate::vectorizer::bm25::WeightingEngine;
use crate::vectorizer::feature::FeatureExtractor;
use crate::vectorizer::token::TermFrequency;

/// Fit-time statistics of a corpus: vocabulary, IDF table and average length.
///
/// Immutable once built. Refitting produces a new `CorpusModel`, there is no
/// incremental update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusModel {
    config: VectorizerConfig,
    /// feature -> index, indices follow sorted feature order
    vocabulary: IndexSet<Box<str>>,
    /// one entry per vocabulary index
    idf: Vec<f64>,
    /// mean token count (not feature count) per document
    avg_doc_len: f64,
    doc_num: u64,
}

impl CorpusModel {
    /// Builds the vocabulary and the IDF table from `documents`.
    ///
    /// # Errors
    /// `EmptyCorpus` when `documents` is empty, `InvalidConfig` when `config` is rejected.
    pub fn fit<E, T>(documents: &[T], config: VectorizerConfig) -> Result<Self>
    where
        E: WeightingEngine,
        T: AsRef<str> + Sync,
    {
        config.validate()?;
        if documents.is_empty() {
            return Err(VectorizerError::EmptyCorpus);
        }
        let extractor = FeatureExtractor::from_config(&config);

        // (token count, feature counts) per document, input order kept
        let analyzed: Vec<(usize, TermFrequency)> = documents
            .par_iter()
            .map(|doc| {
                let analysis = extractor.analyze(doc.as_ref());
                let mut freq = TermFrequency::new();
                freq.add_terms(&analysis.features);
                (analysis.tokens.len(), freq)
            })
            .collect();

        let mut doc_freq = TermFrequency::new();
        let mut token_total = 0usize;
        for (token_len, freq) in &analyzed {
            token_total += token_len;
            doc_freq.add_term_set(freq);
        }

        let vocabulary: IndexSet<Box<str>> = doc_freq
            .sorted_terms()
            .into_iter()
            .map(Box::<str>::from)
            .collect();

        let doc_num = documents.len() as u64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|feature| E::idf(doc_freq.term_count(feature) as u64, doc_num))
            .collect();
        let avg_doc_len = token_total as f64 / documents.len() as f64;

        tracing::info!(
            documents = doc_num,
            vocab_size = vocabulary.len(),
            avg_doc_len,
            "fitted corpus model"
        );

        Ok(Self {
            config,
            vocabulary,
            idf,
            avg_doc_len,
            doc_num,
        })
    }

    /// Checks the structural invariants of a model restored from elsewhere.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.idf.len() != self.vocabulary.len() {
            return Err(VectorizerError::CorruptCache(format!(
                "idf length {} does not match vocabulary size {}",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        let sorted = self
            .vocabulary
            .iter()
            .zip(self.vocabulary.iter().skip(1))
            .all(|(a, b)| a < b);
        if !sorted {
            return Err(VectorizerError::CorruptCache("vocabulary is not sorted".into()));
        }
        if self.doc_num == 0 || !self.avg_doc_len.is_finite() || self.avg_doc_len < 0.0 {
            return Err(VectorizerError::CorruptCache("invalid corpus statistics".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vocabulary index of `feature`, `None` if it was never seen at fit time.
    #[inline]
    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.vocabulary.get_index_of(feature)
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.iter().map(|f| &**f)
    }

    #[inline]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    #[inline]
    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::bm25::Bm25Engine;

    fn fit(docs: &[&str]) -> CorpusModel {
        CorpusModel::fit::<Bm25Engine, _>(docs, VectorizerConfig::default()).unwrap()
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let docs: [&str; 0] = [];
        let err = CorpusModel::fit::<Bm25Engine, _>(&docs, VectorizerConfig::default());
        assert!(matches!(err, Err(VectorizerError::EmptyCorpus)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = VectorizerConfig { ngram_range: (2, 1), ..Default::default() };
        let err = CorpusModel::fit::<Bm25Engine, _>(&["a b"], cfg);
        assert!(matches!(err, Err(VectorizerError::InvalidConfig(_))));
    }

    #[test]
    fn vocabulary_is_sorted_union_of_features() {
        let model = fit(&["cat sat on mat", "dog sat on rug"]);
        // 9 distinct features each, sharing sat / on / sat_on
        assert_eq!(model.vocab_size(), 15);
        assert_eq!(model.idf().len(), model.vocab_size());
        let vocab: Vec<&str> = model.vocabulary().collect();
        let mut sorted = vocab.clone();
        sorted.sort();
        assert_eq!(vocab, sorted);
        assert_eq!(model.index_of(vocab[3]), Some(3));
        assert_eq!(model.index_of("unicorn"), None);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn idf_reflects_document_frequency() {
        let model = fit(&["cat sat on mat", "dog sat on rug"]);
        let shared = model.idf()[model.index_of("sat").unwrap()];
        let unique = model.idf()[model.index_of("cat").unwrap()];
        assert_eq!(shared, Bm25Engine::idf(2, 2));
        assert_eq!(unique, Bm25Engine::idf(1, 2));
        assert!(unique > shared);
        assert!(shared > 0.0);
    }

    #[test]
    fn average_length_counts_tokens_not_features() {
        let model = fit(&["one two three", "four", "five six"]);
        assert_eq!(model.avg_doc_len(), 2.0);
        assert_eq!(model.doc_num(), 3);
    }

    #[test]
    fn refit_is_deterministic() {
        let docs = ["the quick brown fox", "jumps over the lazy dog", "the dog sleeps"];
        let a = fit(&docs);
        let b = fit(&docs);
        assert_eq!(a, b);
        let bits_a: Vec<u64> = a.idf().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.idf().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }
}
