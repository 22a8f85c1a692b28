use std::collections::HashSet;
use std::hash::Hash;

/// Убирает повторы, сохраняя порядок первых вхождений
pub fn unique_stable<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
