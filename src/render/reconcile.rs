use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome of matching previously drawn keys against the next data keys.
///
/// `enter` holds indices into the next keys, `exit` indices into the previous
/// keys, and `update` pairs `(previous, next)` for keys present in both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcilePlan {
    pub enter: Vec<usize>,
    pub update: Vec<(usize, usize)>,
    pub exit: Vec<usize>,
}

impl ReconcilePlan {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.enter.is_empty()
            && self.exit.is_empty()
            && self.update.iter().all(|(previous, next)| previous == next)
    }
}

/// Makes keys unique by suffixing repeats with their occurrence index.
///
/// `["a", "b", "a"]` becomes `["a", "b", "a#1"]`, so rows sharing a key keep
/// separate nodes in a stable order.
#[must_use]
pub fn disambiguate_keys<K: AsRef<str>>(keys: &[K]) -> Vec<String> {
    let mut seen: IndexMap<&str, usize> = IndexMap::with_capacity(keys.len());
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            let count = seen.entry(key).or_insert(0);
            let unique = if *count == 0 {
                key.to_owned()
            } else {
                format!("{key}#{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

/// Computes the enter/update/exit sets for a keyed child list.
#[must_use]
pub fn plan_reconciliation<P: AsRef<str>, N: AsRef<str>>(
    previous: &[P],
    next: &[N],
) -> ReconcilePlan {
    let previous = disambiguate_keys(previous);
    let next = disambiguate_keys(next);

    let previous_index: IndexMap<&str, usize> = previous
        .iter()
        .enumerate()
        .map(|(index, key)| (key.as_str(), index))
        .collect();
    let next_index: IndexMap<&str, usize> = next
        .iter()
        .enumerate()
        .map(|(index, key)| (key.as_str(), index))
        .collect();

    let mut plan = ReconcilePlan::default();
    for (next_position, key) in next.iter().enumerate() {
        match previous_index.get(key.as_str()) {
            Some(previous_position) => plan.update.push((*previous_position, next_position)),
            None => plan.enter.push(next_position),
        }
    }
    plan.exit = previous
        .iter()
        .enumerate()
        .filter(|(_, key)| !next_index.contains_key(key.as_str()))
        .map(|(index, _)| index)
        .collect();
    plan
}
