//! per-child z-index, controlling re-attachment (paint / hit-test) order

use std::collections::HashMap;
use std::hash::Hash;

pub const DEFAULT_Z_INDEX: i32 = 0;

#[derive(Debug, Clone)]
pub struct ZIndexTable<K> {
    entries: HashMap<K, i32>,
}

impl<K> Default for ZIndexTable<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> ZIndexTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_z_index(&mut self, child: K, z_index: i32) {
        self.entries.insert(child, z_index);
    }

    /// stored value, or `DEFAULT_Z_INDEX` for children never configured
    pub fn effective_z_index(&self, child: &K) -> i32 {
        self.entries.get(child).copied().unwrap_or(DEFAULT_Z_INDEX)
    }

    pub fn get(&self, child: &K) -> Option<i32> {
        self.entries.get(child).copied()
    }

    /// children sorted by ascending z-index; equal z-indices keep their input order
    pub fn ordered_by_z_index(&self, children: &[K]) -> Vec<K> {
        let mut ordered = children.to_vec();
        // sort_by_key is stable
        ordered.sort_by_key(|child| self.effective_z_index(child));
        ordered
    }

    /// drop entries for children not in `live`
    pub fn refresh<'a, I>(&mut self, live: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut kept = HashMap::with_capacity(self.entries.len());
        for child in live {
            if let Some(z_index) = self.entries.remove(child) {
                kept.insert(child.clone(), z_index);
            }
        }
        let pruned = self.entries.len();
        self.entries = kept;

        if pruned > 0 {
            tracing::debug!(pruned, kept = self.entries.len(), "pruned z-indices");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
