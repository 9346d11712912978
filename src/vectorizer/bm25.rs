use crate::config::VectorizerConfig;

/// Term weighting strategy plugged into the corpus model and the vector builder.
///
/// `Bm25Engine` is the default and the only engine the recommender ships with;
/// the trait keeps the IDF / TF formulas swappable without touching the pipeline.
pub trait WeightingEngine {
    /// IDF of a feature seen in `doc_freq` of `doc_num` documents.
    fn idf(doc_freq: u64, doc_num: u64) -> f64;

    /// Saturating term frequency of a feature occurring `count` times in a
    /// document of `doc_len` tokens.
    fn tf(count: f64, doc_len: f64, avg_doc_len: f64, config: &VectorizerConfig) -> f64;

    /// Scales a term frequency by the mean context weight of the feature.
    #[inline]
    fn context_boost(tf: f64, context_mean: f64) -> f64 {
        tf * (1.0 + context_mean)
    }
}

/// Okapi BM25 weighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bm25Engine;

impl WeightingEngine for Bm25Engine {
    /// `ln((N - df + 0.5) / (df + 0.5) + 1)`, always non-negative.
    #[inline]
    fn idf(doc_freq: u64, doc_num: u64) -> f64 {
        let n = doc_num as f64;
        let df = doc_freq as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// `count * (k1 + 1) / (count + k1 * (1 - b + b * len / avg_len))`
    #[inline]
    fn tf(count: f64, doc_len: f64, avg_doc_len: f64, config: &VectorizerConfig) -> f64 {
        let k1 = config.k1;
        let b = config.b;
        // avg_doc_len is only zero when the fitted vocabulary is empty
        let len_ratio = if avg_doc_len > 0.0 { doc_len / avg_doc_len } else { 0.0 };
        (count * (k1 + 1.0)) / (count + k1 * (1.0 - b + b * len_ratio))
    }
}
