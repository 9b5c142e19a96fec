//! condition system for layout rules
//!
//! provides a flexible condition system supporting:
//! - logical operators: all (AND), any (OR), not (NOT)
//! - comparison operators: ==, !=, >, >=, <, <= (multiple forms)
//! - set operator: in
//! - implicit AND when multiple fields in one object
//!
//! conditions are tested against the container size in a rule's `when` field.

mod eval;
mod parser;
mod predicate;
mod types;

pub use eval::{evaluate, orientation};
pub use parser::{
    parse_condition, parse_condition_at, parse_definitions, ConditionDefinitions, ParseError,
};
pub use predicate::{ConditionFn, LayoutCondition};
pub use types::{CompareOp, Condition, FieldCondition, SizeField, Value};
