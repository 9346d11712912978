/// Errors returned by the vectorizer, the recommender and their I/O collaborators.
#[derive(Debug, thiserror::Error)]
pub enum VectorizerError {
    /// transform / recommend was called before any corpus was fitted
    #[error("vectorizer must be fit before transform")]
    NotFitted,

    /// recommend was called before any corpus vectors/tags exist
    #[error("recommender is not initialized: no corpus vectors or tags")]
    NotInitialized,

    /// fit was called with zero documents
    #[error("cannot fit on an empty corpus")]
    EmptyCorpus,

    /// texts and tag lists are not positionally aligned
    #[error("{texts} texts but {tags} tag lists")]
    LengthMismatch { texts: usize, tags: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// the loader found no usable `text`/`tags` rows
    #[error("no data: {0}")]
    NoData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_cbor::Error),

    #[error("corrupt cache: {0}")]
    CorruptCache(String),
}

pub type Result<T> = std::result::Result<T, VectorizerError>;
