use std::collections::HashMap;

/// Positional proximity weights keyed by token string.
///
/// Every array has one slot per token of the document. Occurrences of the
/// same token share an array: a later occurrence overwrites the slots inside
/// its window, slots outside it keep what an earlier occurrence wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextVectors {
    vectors: HashMap<String, Vec<f64>>,
}

impl ContextVectors {
    pub fn get(&self, token: &str) -> Option<&[f64]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    /// Mean over the whole array, zero slots included.
    pub fn mean(&self, token: &str) -> Option<f64> {
        let weights = self.get(token)?;
        if weights.is_empty() {
            return Some(0.0);
        }
        Some(weights.iter().sum::<f64>() / weights.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Writes `1 / distance` for every neighbor within `window` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWeighter {
    window: usize,
}

impl ContextWeighter {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn weigh<T: AsRef<str>>(&self, tokens: &[T]) -> ContextVectors {
        let len = tokens.len();
        let mut vectors: HashMap<String, Vec<f64>> = HashMap::new();
        for (i, token) in tokens.iter().enumerate() {
            let start = i.saturating_sub(self.window);
            let end = i.saturating_add(self.window).saturating_add(1).min(len);
            // last write wins, no accumulation across occurrences
            let weights = vectors
                .entry(token.as_ref().to_owned())
                .or_insert_with(|| vec![0.0; len]);
            for j in start..end {
                if j != i {
                    weights[j] = 1.0 / i.abs_diff(j) as f64;
                }
            }
        }
        ContextVectors { vectors }
    }
}
