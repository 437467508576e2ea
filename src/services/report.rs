use std::fmt::{self, Display};

use crate::{
    models::DenseRatingMatrix,
    services::ranking::{rank_ascending, top_n, ScoredId},
};

/// Count given to ids with no ratings, so they rank below every rated id
pub const NO_RATINGS: f64 = -1.0;

/// Which axis of the matrix a report counts along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Movies,
    Users,
}

impl ReportKind {
    fn label(self) -> &'static str {
        match self {
            ReportKind::Movies => "Movies",
            ReportKind::Users => "Users",
        }
    }
}

/// One row of a top-N report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountEntry {
    pub id: usize,
    pub count: usize,
}

/// Highest-count ids along one axis, best first
///
/// Holds at most `requested` entries and fewer when fewer ids have any
/// ratings at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopReport {
    pub kind: ReportKind,
    pub requested: usize,
    pub entries: Vec<CountEntry>,
}

impl TopReport {
    pub fn is_short(&self) -> bool {
        self.entries.len() < self.requested
    }
}

/// Ratings per movie id, index 0 excluded; unrated movies score `NO_RATINGS`
pub fn movie_rating_counts(matrix: &DenseRatingMatrix) -> Vec<ScoredId> {
    (1..matrix.num_movies())
        .map(|movie_id| ScoredId::new(movie_id, as_score(matrix.rated_count_in_column(movie_id))))
        .collect()
}

/// Ratings per user id, index 0 excluded; users without ratings score `NO_RATINGS`
pub fn user_rating_counts(matrix: &DenseRatingMatrix) -> Vec<ScoredId> {
    (1..matrix.num_users())
        .map(|user_id| ScoredId::new(user_id, as_score(matrix.rated_count_in_row(user_id))))
        .collect()
}

/// The `n` most-rated movies
pub fn top_movies(matrix: &DenseRatingMatrix, n: usize) -> TopReport {
    build(ReportKind::Movies, movie_rating_counts(matrix), n)
}

/// The `n` users with the most ratings
pub fn top_users(matrix: &DenseRatingMatrix, n: usize) -> TopReport {
    build(ReportKind::Users, user_rating_counts(matrix), n)
}

fn as_score(count: usize) -> f64 {
    if count == 0 {
        NO_RATINGS
    } else {
        count as f64
    }
}

fn build(kind: ReportKind, counts: Vec<ScoredId>, n: usize) -> TopReport {
    let ranked = rank_ascending(counts);
    let entries = top_n(&ranked, n)
        .into_iter()
        .filter(|entry| entry.score != NO_RATINGS)
        .map(|entry| CountEntry {
            id: entry.id,
            count: entry.score as usize,
        })
        .collect();

    TopReport {
        kind,
        requested: n,
        entries,
    }
}

impl Display for TopReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("Top {} {}:", self.requested, self.kind.label());
        writeln!(f, "#{:>21}{:>15}", title, "Counts:")?;

        for (rank, entry) in self.entries.iter().enumerate() {
            let position = format!("#{}", rank + 1);
            writeln!(f, "{:<4}{:>18}{:>15}", position, entry.id, entry.count)?;
        }

        if self.is_short() {
            writeln!(
                f,
                "# only {} of {} requested {} have ratings",
                self.entries.len(),
                self.requested,
                self.kind.label().to_lowercase()
            )?;
        }

        Ok(())
    }
}
