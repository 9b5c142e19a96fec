//! layout rules and the per-child rule table
//!
//! a child's rules are kept in insertion order and the first rule whose
//! condition holds for the container size wins. nothing in here reorders a
//! list; only `set_rules`/`set_constant_position` replace it.
//!
//! `append_constant_position` adds an always-true rule, so anything appended
//! after it can never win. that is allowed and left to the caller.

use std::collections::HashMap;
use std::hash::Hash;

use crate::conditions::LayoutCondition;
use crate::geometry::Size;
use crate::position::LayoutPosition;

/// a condition paired with the position used when it holds
#[derive(Debug, Clone)]
pub struct LayoutRule {
    pub condition: LayoutCondition,
    pub position: LayoutPosition,
}

impl LayoutRule {
    pub fn new(condition: impl Into<LayoutCondition>, position: LayoutPosition) -> Self {
        Self {
            condition: condition.into(),
            position,
        }
    }

    pub fn always(position: LayoutPosition) -> Self {
        Self::new(LayoutCondition::Always, position)
    }

    /// rule with an ad hoc predicate
    pub fn when<F>(condition: F, position: LayoutPosition) -> Self
    where
        F: Fn(Size) -> bool + Send + Sync + 'static,
    {
        Self::new(LayoutCondition::predicate(condition), position)
    }

    pub fn matches(&self, size: Size) -> bool {
        self.condition.matches(size)
    }
}

/// ordered rule lists keyed by child identity; sparse, children without rules have no entry
#[derive(Debug, Clone)]
pub struct RuleTable<K> {
    entries: HashMap<K, Vec<LayoutRule>>,
}

impl<K> Default for RuleTable<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> RuleTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// replace the child's rule list in full
    pub fn set_rules(&mut self, child: K, rules: Vec<LayoutRule>) {
        self.entries.insert(child, rules);
    }

    /// append after the existing rules (or start a new list)
    pub fn append_rule(&mut self, child: K, rule: LayoutRule) {
        self.entries.entry(child).or_default().push(rule);
    }

    pub fn set_constant_position(&mut self, child: K, position: LayoutPosition) {
        self.set_rules(child, vec![LayoutRule::always(position)]);
    }

    pub fn append_constant_position(&mut self, child: K, position: LayoutPosition) {
        self.append_rule(child, LayoutRule::always(position));
    }

    /// index of the first rule matching `size`
    pub fn matching_index(&self, child: &K, size: Size) -> Option<usize> {
        self.entries
            .get(child)?
            .iter()
            .position(|rule| rule.matches(size))
    }

    /// position of the first rule matching `size`, `None` when nothing matches
    pub fn evaluate(&self, child: &K, size: Size) -> Option<&LayoutPosition> {
        let rules = self.entries.get(child)?;
        let index = rules.iter().position(|rule| rule.matches(size))?;
        tracing::trace!(rule = index, %size, "rule matched");
        Some(&rules[index].position)
    }

    pub fn rules(&self, child: &K) -> Option<&[LayoutRule]> {
        self.entries.get(child).map(Vec::as_slice)
    }

    pub fn contains(&self, child: &K) -> bool {
        self.entries.contains_key(child)
    }

    /// drop entries for children not in `live`; live children without rules stay absent
    pub fn refresh<'a, I>(&mut self, live: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut kept = HashMap::with_capacity(self.entries.len());
        for child in live {
            if let Some(rules) = self.entries.remove(child) {
                kept.insert(child.clone(), rules);
            }
        }
        let pruned = self.entries.len();
        self.entries = kept;

        if pruned > 0 {
            tracing::debug!(pruned, kept = self.entries.len(), "pruned layout rules");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}
