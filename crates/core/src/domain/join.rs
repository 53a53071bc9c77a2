use std::collections::HashMap;
use std::hash::Hash;

/// Pairs each left row with the right-hand record its key resolves to.
///
/// Rows whose key does not resolve are dropped, preserving the order of the
/// rest.
pub fn join_resolved<'a, I, R, K, F>(
    left: I,
    right: &'a HashMap<K, R>,
    key: F,
) -> impl Iterator<Item = (I::Item, &'a R)>
where
    I: IntoIterator,
    K: Eq + Hash,
    F: Fn(&I::Item) -> K,
{
    left.into_iter().filter_map(move |row| {
        let resolved = right.get(&key(&row))?;
        Some((row, resolved))
    })
}
