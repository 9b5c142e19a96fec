//! core types for the condition system

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// equality: ==, eq, equals
    Eq,
    /// inequality: !=, ne, not_equals
    Ne,
    /// greater than: >, gt, greater_than
    Gt,
    /// greater than or equal: >=, gte, greater_than_or_equal
    Gte,
    /// less than: <, lt, less_than
    Lt,
    /// less than or equal: <=, lte, less_than_or_equal
    Lte,
    /// set membership: in
    In,
}

impl CompareOp {
    /// parse operator from string (supports all forms)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" | "eq" | "equals" => Some(CompareOp::Eq),
            "!=" | "ne" | "not_equals" => Some(CompareOp::Ne),
            ">" | "gt" | "greater_than" => Some(CompareOp::Gt),
            ">=" | "gte" | "greater_than_or_equal" => Some(CompareOp::Gte),
            "<" | "lt" | "less_than" => Some(CompareOp::Lt),
            "<=" | "lte" | "less_than_or_equal" => Some(CompareOp::Lte),
            "in" => Some(CompareOp::In),
            _ => None,
        }
    }

    /// true for operators that only make sense on numbers
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte
        )
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::In => "in",
        };
        f.write_str(symbol)
    }
}

/// a property of the container size that a condition can test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField {
    Width,
    Height,
    /// width * height
    Area,
    /// width / height (0 when height is 0)
    Aspect,
    /// "landscape", "portrait" or "square"
    Orientation,
}

impl SizeField {
    pub const NAMES: [&'static str; 5] = ["width", "height", "area", "aspect", "orientation"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "width" | "w" => Some(SizeField::Width),
            "height" | "h" => Some(SizeField::Height),
            "area" => Some(SizeField::Area),
            "aspect" | "aspect_ratio" => Some(SizeField::Aspect),
            "orientation" => Some(SizeField::Orientation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizeField::Width => "width",
            SizeField::Height => "height",
            SizeField::Area => "area",
            SizeField::Aspect => "aspect",
            SizeField::Orientation => "orientation",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, SizeField::Orientation)
    }
}

impl fmt::Display for SizeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// a value that can be used in comparisons
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    /// list of values (for 'in' operator)
    List(Vec<Value>),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// a single field comparison condition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    pub field: SizeField,
    pub op: CompareOp,
    pub value: Value,
}

impl FieldCondition {
    pub fn new(field: SizeField, op: CompareOp, value: Value) -> Self {
        Self { field, op, value }
    }
}

impl fmt::Display for FieldCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// the condition AST - represents a parsed condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// all conditions must be true (AND)
    All(Vec<Condition>),
    /// any condition must be true (OR)
    Any(Vec<Condition>),
    /// negate a condition (NOT)
    Not(Box<Condition>),
    Field(FieldCondition),
    /// reference to a named condition (resolved during parsing)
    Ref(String),
    /// a resolved named condition, shared by every reference to it
    Named(String, Arc<Condition>),
}

impl Condition {
    /// the always-true condition (empty AND)
    pub fn always() -> Self {
        Condition::All(vec![])
    }

    /// the never-true condition (empty OR)
    pub fn never() -> Self {
        Condition::Any(vec![])
    }

    #[allow(clippy::should_implement_trait)]
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    pub fn field(field: SizeField, op: CompareOp, value: Value) -> Self {
        Condition::Field(FieldCondition::new(field, op, value))
    }

    /// true when the condition holds for every size without looking at it
    pub fn is_always(&self) -> bool {
        self.constant(&mut HashMap::new()) == Some(true)
    }

    /// true when the condition fails for every size without looking at it
    pub fn is_never(&self) -> bool {
        self.constant(&mut HashMap::new()) == Some(false)
    }

    /// the fixed outcome of the condition, if it has one; shared nodes are visited once
    fn constant(&self, seen: &mut HashMap<*const Condition, Option<bool>>) -> Option<bool> {
        match self {
            Condition::All(v) => {
                let outcomes: Vec<_> = v.iter().map(|c| c.constant(seen)).collect();
                if outcomes.contains(&Some(false)) {
                    Some(false)
                } else if outcomes.iter().all(|o| *o == Some(true)) {
                    Some(true)
                } else {
                    None
                }
            }
            Condition::Any(v) => {
                let outcomes: Vec<_> = v.iter().map(|c| c.constant(seen)).collect();
                if outcomes.contains(&Some(true)) {
                    Some(true)
                } else if outcomes.iter().all(|o| *o == Some(false)) {
                    Some(false)
                } else {
                    None
                }
            }
            Condition::Not(inner) => inner.constant(seen).map(|b| !b),
            Condition::Named(_, inner) => {
                let key = Arc::as_ptr(inner);
                if let Some(outcome) = seen.get(&key) {
                    return *outcome;
                }
                let outcome = inner.constant(seen);
                seen.insert(key, outcome);
                outcome
            }
            Condition::Field(_) | Condition::Ref(_) => None,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, conditions: &[Condition]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::All(conditions) if conditions.is_empty() => write!(f, "always"),
            Condition::Any(conditions) if conditions.is_empty() => write!(f, "never"),
            Condition::All(conditions) => write_list(f, "all", conditions),
            Condition::Any(conditions) => write_list(f, "any", conditions),
            Condition::Not(inner) => write!(f, "not({})", inner),
            Condition::Field(fc) => write!(f, "{}", fc),
            Condition::Ref(name) => write!(f, "$ref({})", name),
            Condition::Named(name, _) => write!(f, "${}", name),
        }
    }
}
