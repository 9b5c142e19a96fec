//! condition evaluator
//!
//! evaluates parsed conditions against a container size

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{CompareOp, Condition, FieldCondition, SizeField, Value};
use crate::geometry::Size;

/// tolerance for `==`/`!=` on derived values such as aspect ratios
const EPSILON: f64 = 1e-9;

/// evaluate a condition against the given container size
pub fn evaluate(condition: &Condition, size: Size) -> bool {
    evaluate_shared(condition, size, &mut HashMap::new())
}

// named conditions are shared between references, each is evaluated once per call
fn evaluate_shared(
    condition: &Condition,
    size: Size,
    seen: &mut HashMap<*const Condition, bool>,
) -> bool {
    match condition {
        // empty All = true (vacuous truth)
        Condition::All(conditions) => conditions.iter().all(|c| evaluate_shared(c, size, seen)),
        // empty Any = false
        Condition::Any(conditions) => conditions.iter().any(|c| evaluate_shared(c, size, seen)),
        Condition::Not(inner) => !evaluate_shared(inner, size, seen),
        Condition::Field(fc) => evaluate_field(fc, size),
        Condition::Named(_, inner) => {
            let key = Arc::as_ptr(inner);
            if let Some(result) = seen.get(&key) {
                return *result;
            }
            let result = evaluate_shared(inner, size, seen);
            seen.insert(key, result);
            result
        }
        Condition::Ref(name) => {
            // refs are inlined during parsing, reaching one here means a caller built it by hand
            tracing::warn!("unresolved condition reference: {}", name);
            false
        }
    }
}

/// orientation of a size: "landscape", "portrait" or "square"
pub fn orientation(size: Size) -> &'static str {
    if (size.width - size.height).abs() < EPSILON {
        "square"
    } else if size.width > size.height {
        "landscape"
    } else {
        "portrait"
    }
}

fn evaluate_field(fc: &FieldCondition, size: Size) -> bool {
    let actual = match fc.field {
        SizeField::Width => size.width,
        SizeField::Height => size.height,
        SizeField::Area => size.area(),
        SizeField::Aspect => size.aspect(),
        SizeField::Orientation => return compare_str(fc.op, orientation(size), &fc.value),
    };
    compare_number(fc.op, actual, &fc.value)
}

// ============================================================================
// Comparison Helpers
// ============================================================================

fn compare_number(op: CompareOp, actual: f64, expected: &Value) -> bool {
    if op == CompareOp::In {
        return expected
            .as_list()
            .map(|list| list.iter().any(|v| compare_number(CompareOp::Eq, actual, v)))
            .unwrap_or(false);
    }

    let expected = match expected.as_f64() {
        Some(n) => n,
        None => return false,
    };

    match op {
        CompareOp::Eq => (actual - expected).abs() < EPSILON,
        CompareOp::Ne => (actual - expected).abs() >= EPSILON,
        CompareOp::Gt => actual > expected,
        CompareOp::Gte => actual >= expected,
        CompareOp::Lt => actual < expected,
        CompareOp::Lte => actual <= expected,
        CompareOp::In => unreachable!("handled above"),
    }
}

fn compare_str(op: CompareOp, actual: &str, expected: &Value) -> bool {
    match (op, expected) {
        (CompareOp::Eq, Value::String(s)) => actual.eq_ignore_ascii_case(s),
        (CompareOp::Ne, Value::String(s)) => !actual.eq_ignore_ascii_case(s),
        (CompareOp::In, Value::List(list)) => list
            .iter()
            .any(|v| v.as_str().is_some_and(|s| actual.eq_ignore_ascii_case(s))),
        _ => false,
    }
}
