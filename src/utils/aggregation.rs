use std::collections::BTreeMap;

/// Group items by key and fold each group into an accumulator.
///
/// Groups come back in ascending key order, one entry per distinct key.
pub fn group_fold<T, K, A, F, G>(items: impl IntoIterator<Item = T>, key: F, mut fold: G) -> Vec<(K, A)>
where
    K: Ord,
    A: Default,
    F: Fn(&T) -> K,
    G: FnMut(&mut A, T),
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for item in items {
        let acc = groups.entry(key(&item)).or_default();
        fold(acc, item);
    }
    groups.into_iter().collect()
}
