use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::budget::{BudgetDescriptor, BudgetKey};
use crate::domain::dimension::PerformanceVector;
use crate::domain::phone::{CatalogItem, ItemIdentity};

/// Structural cache key: what the item is plus which budget priced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VectorKey {
    item: ItemIdentity,
    budget: Option<BudgetKey>,
}

impl VectorKey {
    pub fn new(item: &CatalogItem, budget: Option<&BudgetDescriptor>) -> Self {
        Self { item: item.identity(), budget: budget.and_then(BudgetDescriptor::cache_key) }
    }
}

/// Read-through, write-once store of performance vectors.
///
/// The first vector stored for a key wins; later inserts for the same key
/// return the stored value, so concurrent callers always observe one vector.
#[derive(Debug, Default)]
pub struct VectorCache {
    entries: RwLock<HashMap<VectorKey, Arc<PerformanceVector>>>,
}

impl VectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &VectorKey) -> Option<Arc<PerformanceVector>> {
        self.entries.read().get(key).cloned()
    }

    pub fn get_or_insert_with<F>(&self, key: VectorKey, compute: F) -> Arc<PerformanceVector>
    where
        F: FnOnce() -> PerformanceVector,
    {
        if let Some(existing) = self.get(&key) {
            return existing;
        }
        // Computed outside the write lock; a racing writer may win.
        let computed = Arc::new(compute());
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert(computed))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{VectorCache, VectorKey};
    use crate::domain::budget::BudgetDescriptor;
    use crate::domain::dimension::{Dimension, PerformanceVector};
    use crate::domain::phone::CatalogItem;

    fn vector_with_cpu(cpu: f64) -> PerformanceVector {
        let mut vector = PerformanceVector::default();
        vector.set(Dimension::CpuPerformance, cpu);
        vector
    }

    #[test]
    fn first_insert_wins() {
        let cache = VectorCache::new();
        let item = CatalogItem { name: "Phone".to_owned(), ..Default::default() };

        let first = cache.get_or_insert_with(VectorKey::new(&item, None), || vector_with_cpu(0.9));
        let second = cache.get_or_insert_with(VectorKey::new(&item, None), || vector_with_cpu(0.1));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.cpu_performance, 0.9);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn budget_is_part_of_the_key() {
        let cache = VectorCache::new();
        let item = CatalogItem { name: "Phone".to_owned(), ..Default::default() };
        let budget = BudgetDescriptor::range(3000.0, 4000.0);

        cache.get_or_insert_with(VectorKey::new(&item, None), PerformanceVector::default);
        cache.get_or_insert_with(VectorKey::new(&item, Some(&budget)), PerformanceVector::default);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&VectorKey::new(&item, Some(&budget))).is_some());
    }

    #[test]
    fn empty_budget_shares_the_unbudgeted_entry() {
        let item = CatalogItem::default();
        assert_eq!(
            VectorKey::new(&item, None),
            VectorKey::new(&item, Some(&BudgetDescriptor::none()))
        );
    }

    #[test]
    fn clear_forces_recomputation() {
        let cache = VectorCache::new();
        let item = CatalogItem::default();
        cache.get_or_insert_with(VectorKey::new(&item, None), || vector_with_cpu(0.9));
        cache.clear();
        assert!(cache.is_empty());

        let fresh = cache.get_or_insert_with(VectorKey::new(&item, None), || vector_with_cpu(0.2));
        assert_eq!(fresh.cpu_performance, 0.2);
    }
}
