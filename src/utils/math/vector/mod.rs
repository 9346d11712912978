pub mod math;
pub mod serde;

use std::fmt::{self, Debug};

use num::Num;

use crate::utils::sort::radix_sort_u32_soa;

/// SparseVec は 0 要素を疎とした疎ベクトルです
/// `inds` は非ゼロ要素のインデックス、`vals` はその値を保持します
///
/// `inds` は常に狭義単調増加 (昇順・重複なし) であることを保証します
/// `len` は論理的な次元数 (= vocabulary size) です
#[derive(Clone, PartialEq)]
pub struct SparseVec<N>
where
    N: Num + Copy,
{
    len: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    /// 全要素ゼロのベクトル
    #[inline]
    pub fn zeros(len: usize) -> Self {
        SparseVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// 順不同の (index, value) 列から構築します
    /// ゼロ値は捨てられ、重複インデックスは後勝ちになります
    ///
    /// # Panics
    /// index が `len` 以上の場合 (debug build のみ)
    pub fn from_entries(len: usize, mut inds: Vec<u32>, mut vals: Vec<N>) -> Self {
        debug_assert_eq!(inds.len(), vals.len());
        debug_assert!(inds.iter().all(|&i| (i as usize) < len));
        radix_sort_u32_soa(&mut inds, &mut vals);

        let mut out_inds: Vec<u32> = Vec::with_capacity(inds.len());
        let mut out_vals: Vec<N> = Vec::with_capacity(vals.len());
        for (ind, val) in inds.into_iter().zip(vals) {
            if out_inds.last() == Some(&ind) {
                // stable sort keeps the later entry last
                if let Some(last) = out_vals.last_mut() {
                    *last = val;
                }
            } else {
                out_inds.push(ind);
                out_vals.push(val);
            }
        }
        // drop zeros after dedup so a later zero clears an earlier value
        let (inds, vals) = out_inds
            .into_iter()
            .zip(out_vals)
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        SparseVec { len, inds, vals }
    }

    /// Builds from already sorted, deduplicated, non-zero entries.
    pub(crate) fn from_sorted_unchecked(len: usize, inds: Vec<u32>, vals: Vec<N>) -> Self {
        SparseVec { len, inds, vals }
    }

    /// 論理次元数
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 非ゼロ要素数
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// 全要素がゼロか
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// index の値 (範囲外・疎要素はゼロ)
    #[inline]
    pub fn get(&self, index: usize) -> N {
        if index >= self.len {
            return N::zero();
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// 非ゼロ要素を (index, value) で昇順に走査します
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().zip(self.vals.iter()).map(|(&i, &v)| (i as usize, v))
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.vals
    }

    /// 密ベクトルへ展開します
    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (i, v) in self.raw_iter() {
            dense[i] = v;
        }
        dense
    }
}

impl<N> Debug for SparseVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "SparseVec(len: {}, nnz: {}) [", self.len, self.nnz())?;
            for (i, v) in self.raw_iter() {
                writeln!(f, "    {}: {:?}", i, v)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("SparseVec")
                .field("len", &self.len)
                .field("entries", &self.raw_iter().collect::<Vec<_>>())
                .finish()
        }
    }
}
