//! Two ranking rules.
//!
//! [`rank_with_shared_ties`] drives the full ranking: equal scores share a rank
//! and the next lower score takes its 1-based position. [`rank_by_position`]
//! drives capped lists such as toppers: every entry gets its position, ties
//! included.

/// Stable sort, highest score first.
pub fn sort_by_score_desc<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub rank: u32,
    pub item: T,
}

/// Sorts by score descending (stable) and shares ranks among equal scores.
///
/// `[90, 90, 80, 80, 70]` ranks as `[1, 1, 3, 3, 5]`.
pub fn rank_with_shared_ties<T>(mut items: Vec<T>, score: impl Fn(&T) -> f64) -> Vec<Ranked<T>> {
    sort_by_score_desc(&mut items, &score);

    let mut ranked: Vec<Ranked<T>> = Vec::with_capacity(items.len());
    let mut previous: Option<(f64, u32)> = None;
    for (index, item) in items.into_iter().enumerate() {
        let position = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let current = score(&item);
        let rank = match previous {
            Some((previous_score, previous_rank)) if current >= previous_score => previous_rank,
            _ => position,
        };
        previous = Some((current, rank));
        ranked.push(Ranked { rank, item });
    }
    ranked
}

/// Assigns 1-based positions in the given order, with no tie sharing.
pub fn rank_by_position<T>(items: Vec<T>) -> Vec<Ranked<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| Ranked {
            rank: u32::try_from(index + 1).unwrap_or(u32::MAX),
            item,
        })
        .collect()
}
