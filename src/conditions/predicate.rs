use std::fmt;
use std::sync::Arc;

use super::eval::evaluate;
use super::types::Condition;
use crate::geometry::Size;

/// caller-supplied predicate, must be pure
pub type ConditionFn = Arc<dyn Fn(Size) -> bool + Send + Sync>;

/// a predicate over the container size deciding whether a rule applies
#[derive(Clone)]
pub enum LayoutCondition {
    Always,
    Expr(Condition),
    Predicate(ConditionFn),
}

impl LayoutCondition {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(Size) -> bool + Send + Sync + 'static,
    {
        LayoutCondition::Predicate(Arc::new(f))
    }

    pub fn matches(&self, size: Size) -> bool {
        match self {
            LayoutCondition::Always => true,
            LayoutCondition::Expr(condition) => evaluate(condition, size),
            LayoutCondition::Predicate(f) => f(size),
        }
    }

    /// true when the condition matches every size; closures are opaque and never count
    pub fn is_always(&self) -> bool {
        match self {
            LayoutCondition::Always => true,
            LayoutCondition::Expr(condition) => condition.is_always(),
            LayoutCondition::Predicate(_) => false,
        }
    }
}

impl From<Condition> for LayoutCondition {
    fn from(condition: Condition) -> Self {
        LayoutCondition::Expr(condition)
    }
}

impl fmt::Debug for LayoutCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutCondition::Always => f.write_str("Always"),
            LayoutCondition::Expr(condition) => f.debug_tuple("Expr").field(condition).finish(),
            LayoutCondition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl fmt::Display for LayoutCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutCondition::Always => f.write_str("always"),
            LayoutCondition::Expr(condition) => write!(f, "{}", condition),
            LayoutCondition::Predicate(_) => f.write_str("predicate"),
        }
    }
}
