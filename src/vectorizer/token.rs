use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermFrequency 構造体
/// term の出現回数を管理するための構造体です
///
/// 文書内の特徴量カウント (BM25 の tf) と、
/// コーパス全体の文書頻度 (df) の両方に使います
///
/// # Examples
/// ```
/// use hashtag_vectorizer::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["cat", "sat", "cat"]);
/// assert_eq!(freq.term_count("cat"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// term の追加
impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// term を 1 つ追加する
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        if let Some(count) = self.term_count.get_mut(term) {
            *count += 1;
        } else {
            self.term_count.insert(term.to_owned(), 1);
        }
        self.total_term_count += 1;
        self
    }

    /// 複数の term を追加する
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// 別の TermFrequency のユニーク term をそれぞれ 1 回ずつ数える
    /// 文書頻度 (document frequency) の集計用
    #[inline]
    pub fn add_term_set(&mut self, other: &TermFrequency) -> &mut Self {
        for term in other.term_count.keys() {
            self.add_term(term);
        }
        self
    }
}

/// 参照系
impl TermFrequency {
    /// term の出現回数 (無ければ 0)
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// 全 term の出現回数の合計
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// ユニーク term 数
    #[inline]
    pub fn len(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// (term, count) を初出順に走査します
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// 辞書順 (バイト順) でソートされたユニーク term
    pub fn sorted_terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.term_count.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }
}
