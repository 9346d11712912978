//! On-disk cache for the fitted recommender snapshot.
//!
//! File layout: `[cbor payload][magic "HVS1"][u32 CRC32 BE]`. Writes go to a
//! temp file and are renamed into place, so a reader never sees a half
//! written snapshot.

use std::fs;
use std::path::PathBuf;

use crate::error::{Result, VectorizerError};
use crate::recommend::RecommenderSnapshot;

const SNAPSHOT_FILE: &str = "snapshot.cbor";
const SNAPSHOT_MAGIC: &[u8; 4] = b"HVS1";
const FOOTER_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    pub fn save(&self, snapshot: &RecommenderSnapshot) -> Result<()> {
        let payload = serde_cbor::to_vec(snapshot)?;
        let crc = crc32fast::hash(&payload);

        let mut output = Vec::with_capacity(payload.len() + FOOTER_LEN);
        output.extend_from_slice(&payload);
        output.extend_from_slice(SNAPSHOT_MAGIC);
        output.extend_from_slice(&crc.to_be_bytes());

        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        let tmp_path = self.dir.join(format!("{SNAPSHOT_FILE}.tmp"));
        fs::write(&tmp_path, &output)?;
        fs::rename(&tmp_path, &path)?;

        tracing::info!(
            path = %path.display(),
            bytes = payload.len(),
            documents = snapshot.doc_num(),
            "saved snapshot cache"
        );
        Ok(())
    }

    /// `Ok(None)` when no cache file exists yet.
    pub fn load(&self) -> Result<Option<RecommenderSnapshot>> {
        let path = self.path();
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read(&path)?;
        let payload = verify_footer(&raw)?;
        let snapshot: RecommenderSnapshot = serde_cbor::from_slice(payload)?;
        snapshot.validate()?;

        tracing::info!(
            path = %path.display(),
            documents = snapshot.doc_num(),
            vocab_size = snapshot.model.vocab_size(),
            "loaded snapshot cache"
        );
        Ok(Some(snapshot))
    }

    /// Removes the cache file if present.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn verify_footer(raw: &[u8]) -> Result<&[u8]> {
    if raw.len() < FOOTER_LEN || &raw[raw.len() - FOOTER_LEN..raw.len() - 4] != SNAPSHOT_MAGIC {
        return Err(VectorizerError::CorruptCache("missing snapshot footer".into()));
    }
    let (payload, footer) = raw.split_at(raw.len() - FOOTER_LEN);
    let stored = u32::from_be_bytes([footer[4], footer[5], footer[6], footer[7]]);
    let computed = crc32fast::hash(payload);
    if stored != computed {
        return Err(VectorizerError::CorruptCache(format!(
            "CRC32 mismatch: expected {stored:#010x}, got {computed:#010x}"
        )));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizerConfig;
    use crate::vectorizer::bm25::Bm25Engine;
    use crate::vectorizer::builder::DocumentVectorBuilder;

    fn snapshot() -> RecommenderSnapshot {
        RecommenderSnapshot::build::<Bm25Engine, _>(
            &["cat sat on mat", "dog sat on rug", "the cat chased the dog"],
            vec![vec!["cats".into()], vec!["dogs".into()], vec!["cats".into(), "dogs".into()]],
            VectorizerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn missing_cache_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path().join("cache"));
        assert!(!cache.exists());
        assert!(cache.load().unwrap().is_none());
        assert!(cache.clear().is_ok());
    }

    #[test]
    fn round_trip_is_bit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path());
        let original = snapshot();
        cache.save(&original).unwrap();
        assert!(cache.exists());

        let restored = SnapshotCache::new(dir.path()).load().unwrap().unwrap();
        assert_eq!(original, restored);

        let text = "a cat on a mat";
        let a = DocumentVectorBuilder::<Bm25Engine>::new(&original.model).build(text);
        let b = DocumentVectorBuilder::<Bm25Engine>::new(&restored.model).build(text);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(a.values()), bits(b.values()));
        for (x, y) in original.vectors.iter().zip(&restored.vectors) {
            assert_eq!(bits(x.values()), bits(y.values()));
        }
    }

    #[test]
    fn corrupted_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path());
        cache.save(&snapshot()).unwrap();

        let mut raw = fs::read(cache.path()).unwrap();
        raw[10] ^= 0xFF;
        fs::write(cache.path(), &raw).unwrap();
        assert!(matches!(cache.load(), Err(VectorizerError::CorruptCache(_))));

        fs::write(cache.path(), b"garbage").unwrap();
        assert!(matches!(cache.load(), Err(VectorizerError::CorruptCache(_))));
    }

    #[test]
    fn initialize_prefers_cache_without_topic() {
        let data = tempfile::tempdir().unwrap();
        fs::write(
            data.path().join("pets.csv"),
            "text,tags\ncat sat on mat,cats\ndog sat on rug,dogs\n",
        )
        .unwrap();
        fs::write(data.path().join("birds.csv"), "text,tags\nbird flies high,birds\n").unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(cache_dir.path());

        let mut first: crate::HashtagRecommender = crate::HashtagRecommender::new();
        first.initialize(data.path(), Some(&cache), None).unwrap();
        assert!(cache.exists());
        assert_eq!(first.snapshot().unwrap().doc_num(), 3);

        // corpus removed: only the cache can satisfy a topic-less initialize
        fs::remove_file(data.path().join("pets.csv")).unwrap();
        fs::remove_file(data.path().join("birds.csv")).unwrap();
        let mut second: crate::HashtagRecommender = crate::HashtagRecommender::new();
        second.initialize(data.path(), Some(&cache), None).unwrap();
        assert_eq!(second.snapshot().unwrap().doc_num(), 3);

        // a topic always reloads from the data directory
        let mut third: crate::HashtagRecommender = crate::HashtagRecommender::new();
        assert!(matches!(
            third.initialize(data.path(), Some(&cache), Some("pets")),
            Err(VectorizerError::NoData(_))
        ));
    }

    #[test]
    fn clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path());
        cache.save(&snapshot()).unwrap();
        cache.clear().unwrap();
        assert!(!cache.exists());
    }
}
