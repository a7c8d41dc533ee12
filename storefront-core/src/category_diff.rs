//! Minimal diff between a product's stored and desired category sets

/// Rows to delete and insert so the stored set equals the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDiff {
    /// Desired categories not yet stored, in desired order
    pub to_insert: Vec<i64>,
    /// Stored categories no longer desired, in stored order
    pub to_remove: Vec<i64>,
}

impl CategoryDiff {
    /// `to_insert = desired - current`, `to_remove = current - desired`.
    ///
    /// Duplicates in `desired` collapse, so the result never inserts the same
    /// pair twice.
    ///
    /// # Example
    /// ```
    /// use storefront_core::CategoryDiff;
    ///
    /// let diff = CategoryDiff::compute(&[1, 3, 4], &[1, 2]);
    /// assert_eq!(diff.to_insert, vec![3, 4]);
    /// assert_eq!(diff.to_remove, vec![2]);
    /// ```
    pub fn compute(desired: &[i64], current: &[i64]) -> Self {
        let mut to_insert = Vec::new();
        for id in desired {
            if !current.contains(id) && !to_insert.contains(id) {
                to_insert.push(*id);
            }
        }

        let mut to_remove = Vec::new();
        for id in current {
            if !desired.contains(id) && !to_remove.contains(id) {
                to_remove.push(*id);
            }
        }

        Self { to_insert, to_remove }
    }

    /// True when the stored set already matches.
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_remove.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn unchanged_set_is_empty_diff() {
        let diff = CategoryDiff::compute(&[2, 1], &[1, 2]);
        assert!(diff.is_empty());
    }

    #[test]
    fn clearing_removes_everything() {
        let diff = CategoryDiff::compute(&[], &[5, 6]);
        assert!(diff.to_insert.is_empty());
        assert_eq!(diff.to_remove, vec![5, 6]);
    }

    #[test]
    fn duplicates_collapse() {
        let diff = CategoryDiff::compute(&[7, 7, 8], &[8]);
        assert_eq!(diff.to_insert, vec![7]);
        assert!(diff.to_remove.is_empty());
    }

    proptest! {
        /// Applying delete-then-insert to the stored set yields exactly the desired set.
        #[test]
        fn prop_apply_reaches_desired(
            desired in prop::collection::vec(1i64..20, 0..12),
            current in prop::collection::btree_set(1i64..20, 0..12),
        ) {
            let current: Vec<i64> = current.into_iter().collect();
            let diff = CategoryDiff::compute(&desired, &current);

            let mut stored: Vec<i64> = current
                .iter()
                .copied()
                .filter(|id| !diff.to_remove.contains(id))
                .collect();
            stored.extend(diff.to_insert.iter().copied());

            let stored_set: BTreeSet<i64> = stored.iter().copied().collect();
            let desired_set: BTreeSet<i64> = desired.iter().copied().collect();

            prop_assert_eq!(stored.len(), stored_set.len());
            prop_assert!(stored_set.symmetric_difference(&desired_set).next().is_none());
        }

        /// Rows present in both sets are never touched.
        #[test]
        fn prop_keeps_shared_rows(
            desired in prop::collection::vec(1i64..20, 0..12),
            current in prop::collection::btree_set(1i64..20, 0..12),
        ) {
            let current: Vec<i64> = current.into_iter().collect();
            let diff = CategoryDiff::compute(&desired, &current);
            for id in current.iter().filter(|id| desired.contains(id)) {
                prop_assert!(!diff.to_remove.contains(id));
                prop_assert!(!diff.to_insert.contains(id));
            }
        }
    }
}
