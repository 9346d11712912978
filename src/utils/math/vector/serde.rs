use num::Num;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SparseVec;

impl<N> Serialize for SparseVec<N>
where
    N: Num + Serialize + Copy,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // len, nnz, entries を出力
        let mut state = serializer.serialize_struct("SparseVec", 3)?;
        state.serialize_field("len", &(self.len as u64))?;
        state.serialize_field("nnz", &(self.nnz() as u64))?;
        // entries: (index, value) の昇順リスト
        let entries: Vec<(u32, N)> = self.inds.iter().copied().zip(self.vals.iter().copied()).collect();
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for SparseVec<N>
where
    N: Num + Deserialize<'de> + Copy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SparseVecData<N> {
            len: u64,
            nnz: u64,
            entries: Vec<(u32, N)>,
        }

        let data = SparseVecData::<N>::deserialize(deserializer)?;
        let len = usize::try_from(data.len).map_err(D::Error::custom)?;
        if data.entries.len() as u64 != data.nnz {
            return Err(DeError::custom("nnz does not match entries length"));
        }

        let mut inds = Vec::with_capacity(data.entries.len());
        let mut vals = Vec::with_capacity(data.entries.len());
        for (ind, val) in data.entries {
            if (ind as usize) >= len {
                return Err(DeError::custom("entry index out of range"));
            }
            if inds.last().is_some_and(|&last| last >= ind) {
                return Err(DeError::custom("entry indices must be strictly increasing"));
            }
            inds.push(ind);
            vals.push(val);
        }
        Ok(SparseVec::from_sorted_unchecked(len, inds, vals))
    }
}
