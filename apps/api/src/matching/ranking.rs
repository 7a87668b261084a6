use crate::models::match_result::{MatchResultRow, RankAssignment};

/// Number of top-ranked candidates that make the longlist.
pub const LONGLIST_SIZE: usize = 20;

/// Ranks results by final score, highest first. The sort is stable, so equal
/// scores keep the order they arrive in (creation order from the store).
/// Ranks are 1-based and contiguous.
pub fn assign_ranks(results: &[MatchResultRow]) -> Vec<RankAssignment> {
    let mut ordered: Vec<&MatchResultRow> = results.iter().collect();
    ordered.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, result)| RankAssignment {
            result_id: result.id,
            rank: index as i32 + 1,
            is_in_longlist: index < LONGLIST_SIZE,
        })
        .collect()
}
