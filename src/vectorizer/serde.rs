use std::sync::Arc;

use ::serde::ser::SerializeStruct;
use ::serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::Result;
use crate::vectorizer::bm25::WeightingEngine;
use crate::vectorizer::corpus::CorpusModel;
use crate::vectorizer::Vectorizer;

/// Vectorizer のデシリアライズ用データ構造
/// `Arc` を含まないので、そのままデシリアライズできます
/// `into_vectorizer` で検証したうえで `Vectorizer` に変換します
#[derive(Debug, Deserialize)]
pub struct VectorizerData {
    pub config: VectorizerConfig,
    pub model: Option<CorpusModel>,
}

impl VectorizerData {
    /// `VectorizerData` から `Vectorizer` に変換します
    /// モデルの不変条件が崩れていれば `CorruptCache` を返します
    pub fn into_vectorizer<E>(self) -> Result<Vectorizer<E>>
    where
        E: WeightingEngine + Send + Sync,
    {
        match self.model {
            Some(model) => Vectorizer::from_model(Arc::new(model)),
            None => Vectorizer::with_config(self.config),
        }
    }
}

impl<E> Serialize for Vectorizer<E>
where
    E: WeightingEngine + Send + Sync,
{
    /// Vectorizer をシリアライズします
    /// 復元には `VectorizerData` を使用してください
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Vectorizer", 2)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("model", &self.model.as_deref())?;
        state.end()
    }
}
