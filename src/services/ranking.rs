use std::cmp::Ordering;

/// An id with the score it is ranked by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredId {
    pub id: usize,
    pub score: f64,
}

impl ScoredId {
    pub fn new(id: usize, score: f64) -> Self {
        Self { id, score }
    }
}

/// Builds entries from parallel score / id slices, `None` if their lengths differ
pub fn zip_scores(scores: &[f64], ids: &[usize]) -> Option<Vec<ScoredId>> {
    if scores.len() != ids.len() {
        return None;
    }
    Some(
        scores
            .iter()
            .zip(ids)
            .map(|(&score, &id)| ScoredId::new(id, score))
            .collect(),
    )
}

/// Orders entries by ascending score
///
/// Stable: entries with equal scores keep their input order. NaN scores
/// sort after every number.
pub fn rank_ascending(mut entries: Vec<ScoredId>) -> Vec<ScoredId> {
    entries.sort_by(compare_scores);
    entries
}

/// The `n` highest-scored entries, best first, read from the end of an
/// ascending ranking
///
/// Returns fewer than `n` entries when the ranking is shorter.
pub fn top_n(ranked: &[ScoredId], n: usize) -> Vec<ScoredId> {
    ranked.iter().rev().take(n).copied().collect()
}

fn compare_scores(a: &ScoredId, b: &ScoredId) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => a.score.total_cmp(&b.score),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}
