use serde::{Deserialize, Serialize};

use crate::candidates::model::CandidateRecord;
use crate::candidates::percentage::extract_match_percentage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Stable sort by a percentage key. Equal keys keep their relative order.
pub fn sort_by_match<T>(items: &mut [T], direction: SortDirection, key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        match direction {
            SortDirection::Asc => ka.total_cmp(&kb),
            SortDirection::Desc => kb.total_cmp(&ka),
        }
    });
}

/// Sort key for a candidate: the free-text match field of its raw result when
/// the backend sent one, its relevance score otherwise.
pub fn candidate_match_percentage(record: &CandidateRecord) -> f64 {
    extract_match_percentage(&record.raw).unwrap_or_else(|| record.relevance_score.percent())
}

pub fn sort_candidates(records: &mut [CandidateRecord], direction: SortDirection) {
    sort_by_match(records, direction, candidate_match_percentage);
}
