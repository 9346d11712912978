use std::cmp::Ordering;

use num::Float;

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Float,
{
    /// ドット積を計算するメソッド
    /// インデックスの昇順マージで非ゼロ同士のみ掛け合わせます
    ///
    /// # Arguments
    /// * `other` - 他のベクトル
    ///
    /// # Returns
    /// * `N` - ドット積の結果
    #[inline]
    pub fn dot(&self, other: &Self) -> N {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let mut result = N::zero();
        let (a_inds, a_vals) = (&self.inds, &self.vals);
        let (b_inds, b_vals) = (&other.inds, &other.vals);
        let mut i = 0;
        let mut j = 0;
        while i < a_inds.len() && j < b_inds.len() {
            match a_inds[i].cmp(&b_inds[j]) {
                Ordering::Equal => {
                    result = result + a_vals[i] * b_vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// L2 ノルム
    #[inline]
    pub fn norm(&self) -> N {
        self.vals
            .iter()
            .fold(N::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// L2 正規化したベクトルを返します
    /// ノルムがゼロならそのまま (ゼロベクトル) 返します
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm.is_zero() {
            return self;
        }
        for v in self.vals.iter_mut() {
            *v = *v / norm;
        }
        self
    }
}
