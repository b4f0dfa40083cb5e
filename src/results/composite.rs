use crate::model::{BallotCategory, RawMetrics};
use crate::results::aggregate::CategoryTotals;

/// Raw sums of the TEAM pseudo-category: the element-wise total of the
/// national, district, parliament and presidential ballots.
///
/// Ratios for TEAM must be computed from this total, not averaged from the
/// member categories.
pub fn build_team(per_category: &CategoryTotals) -> RawMetrics {
    BallotCategory::TEAM
        .iter()
        .filter_map(|category| per_category.get(category))
        .sum()
}
