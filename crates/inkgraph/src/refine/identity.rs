//! Node identity remapping across refinement stages.

use std::collections::HashMap;

use inkgraph_core::identifier::Id;

/// Records which node absorbed which during one refinement stage.
///
/// Ids without an entry resolve to themselves. Maps of consecutive stages
/// are combined with [`IdentityMap::then`], so an edge endpoint is rewritten
/// once through the composed map instead of stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    targets: HashMap<Id, Id>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `old` now lives on as `survivor`.
    pub fn record(&mut self, old: Id, survivor: Id) {
        self.targets.insert(old, survivor);
    }

    /// Returns the survivor of `id`.
    pub fn resolve(&self, id: Id) -> Id {
        self.targets.get(&id).copied().unwrap_or(id)
    }

    /// Composes this map with the map of the following stage.
    ///
    /// For every id `x`, `self.then(next).resolve(x)` equals
    /// `next.resolve(self.resolve(x))`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkgraph::refine::IdentityMap;
    /// # use inkgraph_core::identifier::Id;
    /// let mut merge = IdentityMap::new();
    /// merge.record(Id::new("a"), Id::new("b"));
    /// let mut dedup = IdentityMap::new();
    /// dedup.record(Id::new("b"), Id::new("c"));
    ///
    /// let composed = merge.then(&dedup);
    /// assert_eq!(composed.resolve(Id::new("a")), Id::new("c"));
    /// assert_eq!(composed.resolve(Id::new("b")), Id::new("c"));
    /// ```
    pub fn then(&self, next: &IdentityMap) -> IdentityMap {
        let mut targets: HashMap<Id, Id> = self
            .targets
            .iter()
            .map(|(&old, &mid)| (old, next.resolve(mid)))
            .collect();
        for (&old, &survivor) in &next.targets {
            targets.entry(old).or_insert(survivor);
        }
        IdentityMap { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<(Id, Id)> for IdentityMap {
    fn from_iter<T: IntoIterator<Item = (Id, Id)>>(iter: T) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn id_strategy() -> impl Strategy<Value = Id> {
        (0u8..12).prop_map(|n| Id::new(&format!("n{n}")))
    }

    fn map_strategy() -> impl Strategy<Value = IdentityMap> {
        prop::collection::vec((id_strategy(), id_strategy()), 0..12)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn composition_matches_sequential_resolution(
            first in map_strategy(),
            second in map_strategy(),
            id in id_strategy(),
        ) {
            let composed = first.then(&second);
            prop_assert_eq!(composed.resolve(id), second.resolve(first.resolve(id)));
        }
    }
}
