/// This crate is a hashtag recommendation engine built on a BM25 text vectorizer.
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod recommend;
pub mod utils;
pub mod vectorizer;

/// Text Vectorizer
/// Fits a vocabulary and BM25 IDF table on a document collection and turns texts
/// into L2-normalized sparse vectors.
///
/// Features are word n-grams plus character subwords of every token. Term
/// frequency is BM25-saturated and boosted by the token's mean context weight.
///
/// The fitted state is held as `Arc<CorpusModel>`, so a refit swaps the model
/// without disturbing readers of the previous one.
///
/// # Serialization
/// Supported. `VectorizerData` is the owned form used for deserialization.
pub use vectorizer::Vectorizer;

/// Vectorizer Data Structure for Serialization
/// Owned, `Arc`-free form of `Vectorizer`.
/// Convert it back with `into_vectorizer`.
pub use vectorizer::serde::VectorizerData;

/// Corpus Model
/// Vocabulary (sorted, deduplicated), per-feature IDF, average document length
/// and document count from one fit. Immutable once built.
pub use vectorizer::corpus::CorpusModel;

/// Turns one text into a normalized vector against a fitted `CorpusModel`.
pub use vectorizer::builder::DocumentVectorBuilder;

/// Tokenizer, n-gram and subword generation.
pub use vectorizer::feature::FeatureExtractor;

/// Window-based context weights per token.
pub use vectorizer::context::ContextWeighter;

/// Term Frequency structure
/// Counts term occurrences and the total term count.
/// Used for per-document counts and for corpus document frequency.
pub use vectorizer::token::TermFrequency;

/// Weighting Engine Trait
/// Defines the IDF, TF and context boost formulas.
/// `Bm25Engine` is the default.
pub use vectorizer::bm25::{Bm25Engine, WeightingEngine};

/// Hashtag Recommender
/// Vectorizes a query, finds its nearest corpus documents by cosine similarity
/// and ranks the tags of those documents by frequency.
pub use recommend::{HashtagRecommender, RecommenderSnapshot};

/// Nearest neighbor ranking and its scored hit list.
pub use recommend::rank::{Hits, SimilarityRanker};

/// CRC-checked on-disk snapshot cache.
pub use cache::SnapshotCache;

/// CSV corpus loading.
pub use loader::{load_corpus, LabeledCorpus};

pub use config::{RecommenderConfig, VectorizerConfig};
pub use error::{Result, VectorizerError};
