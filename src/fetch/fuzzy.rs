//! In-memory fuzzy ranking over a fixed corpus of labels.
//!
//! A target matches when every character of the query occurs in it in order,
//! ignoring case. Matches are ranked by Levenshtein distance to the query.

use serde::Serialize;

/// One corpus entry that matched a query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rank {
    pub source: String,
    pub target: String,
    pub distance: usize,
    /// Position of `target` in the corpus.
    pub original_index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FuzzyIndex {
    targets: Vec<String>,
    folded: Vec<String>,
}

impl FuzzyIndex {
    pub fn new(targets: Vec<String>) -> Self {
        let folded = targets.iter().map(|t| t.to_lowercase()).collect();
        Self { targets, folded }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All matching targets, closest first. Ties keep corpus order.
    pub fn rank(&self, source: &str) -> Vec<Rank> {
        let folded_source = source.to_lowercase();
        let mut ranks: Vec<Rank> = self
            .targets
            .iter()
            .zip(&self.folded)
            .enumerate()
            .filter(|(_, (_, folded))| is_subsequence(&folded_source, folded))
            .map(|(index, (target, _))| Rank {
                source: source.to_string(),
                target: target.clone(),
                distance: levenshtein(source, target),
                original_index: index,
            })
            .collect();
        ranks.sort_by_key(|r| r.distance);
        ranks
    }
}

/// True when every char of `needle` appears in `haystack` in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    if haystack.chars().count() < needle.chars().count() {
        return false;
    }
    let mut rest = haystack.chars();
    needle.chars().all(|n| rest.any(|h| h == n))
}

/// Edit distance over chars with unit costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut column: Vec<usize> = (0..=a.len()).collect();

    for (x, cb) in b.iter().enumerate() {
        let mut last_diag = column[0];
        column[0] = x + 1;
        for y in 1..=a.len() {
            let old_diag = column[y];
            let cost = usize::from(a[y - 1] != *cb);
            column[y] = (column[y] + 1).min(column[y - 1] + 1).min(last_diag + cost);
            last_diag = old_diag;
        }
    }

    column[a.len()]
}
