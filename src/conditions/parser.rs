//! condition parser - converts JSON to condition AST
//!
//! supports:
//! - logical operators: all, any, not
//! - comparison operators: ==, !=, >, >=, <, <= (multiple forms)
//! - set operator: in
//! - implicit AND when multiple fields in one object
//! - $ref for referencing named conditions

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value as JsonValue;
use strsim::levenshtein;

use super::types::{CompareOp, Condition, FieldCondition, SizeField, Value};

const ORIENTATIONS: [&str; 3] = ["landscape", "portrait", "square"];

/// error type for parsing conditions
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub path: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// named condition definitions, used for $ref resolution
pub type ConditionDefinitions = HashMap<String, Condition>;

/// parse a JSON value into a condition AST
pub fn parse_condition(
    json: &JsonValue,
    definitions: &ConditionDefinitions,
) -> Result<Condition, ParseError> {
    parse_condition_internal(json, definitions, "")
}

/// like `parse_condition`, with error paths prefixed by `path`
pub fn parse_condition_at(
    json: &JsonValue,
    definitions: &ConditionDefinitions,
    path: &str,
) -> Result<Condition, ParseError> {
    parse_condition_internal(json, definitions, path)
}

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

fn parse_condition_internal(
    json: &JsonValue,
    definitions: &ConditionDefinitions,
    path: &str,
) -> Result<Condition, ParseError> {
    match json {
        JsonValue::Object(obj) => parse_object(obj, definitions, path),
        // bare boolean: true = always, false = never
        JsonValue::Bool(true) => Ok(Condition::always()),
        JsonValue::Bool(false) => Ok(Condition::never()),
        JsonValue::String(s) => {
            // bare string is a $ref shorthand
            if let Some(name) = s.strip_prefix('$') {
                resolve_ref(name, definitions, path)
            } else {
                let message = format!(
                    "unexpected string value: '{}' (use \"${}\" to reference a named condition)",
                    s, s
                );
                Err(ParseError::new(message, path))
            }
        }
        _ => Err(ParseError::new(
            format!("expected object, got {}", json),
            path,
        )),
    }
}

fn parse_object(
    obj: &serde_json::Map<String, JsonValue>,
    definitions: &ConditionDefinitions,
    path: &str,
) -> Result<Condition, ParseError> {
    let mut conditions = Vec::new();

    // multiple keys = implicit AND, logical operators included
    for (key, value) in obj {
        let key_path = join_path(path, key);
        let condition = match key.as_str() {
            "all" => Condition::All(parse_list(value, definitions, &key_path)?),
            "any" => Condition::Any(parse_list(value, definitions, &key_path)?),
            "not" => Condition::negate(parse_condition_internal(value, definitions, &key_path)?),
            "$ref" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| ParseError::new("'$ref' must be a string", &key_path))?;
                resolve_ref(name, definitions, &key_path)?
            }
            _ => parse_field_condition(key, value, &key_path)?,
        };
        conditions.push(condition);
    }

    match conditions.len() {
        0 => Ok(Condition::always()), // empty object = true
        1 => Ok(conditions.remove(0)),
        _ => Ok(Condition::All(conditions)),
    }
}

fn parse_list(
    value: &JsonValue,
    definitions: &ConditionDefinitions,
    path: &str,
) -> Result<Vec<Condition>, ParseError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ParseError::new("expected an array of conditions", path))?;

    arr.iter()
        .enumerate()
        .map(|(i, v)| parse_condition_internal(v, definitions, &format!("{}[{}]", path, i)))
        .collect()
}

fn resolve_ref(
    name: &str,
    definitions: &ConditionDefinitions,
    path: &str,
) -> Result<Condition, ParseError> {
    definitions
        .get(name)
        .cloned()
        .ok_or_else(|| ParseError::new(format!("undefined condition reference: '{}'", name), path))
}

fn parse_field(name: &str, path: &str) -> Result<SizeField, ParseError> {
    SizeField::parse(name).ok_or_else(|| {
        let suggestion = SizeField::NAMES
            .iter()
            .map(|candidate| (candidate, levenshtein(name, candidate)))
            .filter(|(_, distance)| *distance <= 2)
            .min_by_key(|(_, distance)| *distance);

        let message = match suggestion {
            Some((candidate, _)) => {
                format!("unknown field '{}', did you mean '{}'?", name, candidate)
            }
            None => format!(
                "unknown field '{}', expected one of: {}",
                name,
                SizeField::NAMES.join(", ")
            ),
        };
        ParseError::new(message, path)
    })
}

fn parse_field_condition(
    name: &str,
    value: &JsonValue,
    path: &str,
) -> Result<Condition, ParseError> {
    let field = parse_field(name, path)?;

    let conditions = match value {
        // operator object: { "width": { ">=": 500, "<": 900 } }
        JsonValue::Object(obj) => {
            let mut conditions = Vec::with_capacity(obj.len());
            for (op_str, op_value) in obj {
                let op = CompareOp::parse(op_str).ok_or_else(|| {
                    ParseError::new(format!("unknown operator: '{}'", op_str), path)
                })?;
                let value = parse_value(op_value, path)?;
                conditions.push(check_field(FieldCondition::new(field, op, value), path)?);
            }
            conditions
        }
        // array value: shorthand for 'in'
        JsonValue::Array(_) => {
            let value = parse_value(value, path)?;
            vec![check_field(FieldCondition::new(field, CompareOp::In, value), path)?]
        }
        // simple value: { "width": 800 } or { "orientation": "portrait" }
        _ => {
            let value = parse_value(value, path)?;
            vec![check_field(FieldCondition::new(field, CompareOp::Eq, value), path)?]
        }
    };

    let mut conditions: Vec<Condition> = conditions.into_iter().map(Condition::Field).collect();
    match conditions.len() {
        0 => Err(ParseError::new("empty operator object", path)),
        1 => Ok(conditions.remove(0)),
        _ => Ok(Condition::All(conditions)), // multiple operators = AND
    }
}

/// reject comparisons that can never be meaningful for the field
fn check_field(fc: FieldCondition, path: &str) -> Result<FieldCondition, ParseError> {
    let check_scalar = |value: &Value| -> Result<(), ParseError> {
        match (fc.field.is_numeric(), value) {
            (true, Value::Number(_)) => Ok(()),
            (true, other) => Err(ParseError::new(
                format!("'{}' compares against numbers, got {}", fc.field, other),
                path,
            )),
            (false, Value::String(s)) if ORIENTATIONS.contains(&s.as_str()) => Ok(()),
            (false, other) => Err(ParseError::new(
                format!(
                    "'{}' must be one of {}, got {}",
                    fc.field,
                    ORIENTATIONS.join(", "),
                    other
                ),
                path,
            )),
        }
    };

    match (&fc.op, &fc.value) {
        (CompareOp::In, Value::List(items)) => {
            for item in items {
                check_scalar(item)?;
            }
        }
        (CompareOp::In, other) => {
            return Err(ParseError::new(
                format!("'in' expects an array, got {}", other),
                path,
            ))
        }
        (_, Value::List(_)) => {
            return Err(ParseError::new(
                format!("operator '{}' does not take an array", fc.op),
                path,
            ))
        }
        (op, value) => {
            if op.is_ordering() && !fc.field.is_numeric() {
                return Err(ParseError::new(
                    format!("operator '{}' is not supported for '{}'", op, fc.field),
                    path,
                ));
            }
            check_scalar(value)?;
        }
    }

    Ok(fc)
}

fn parse_value(json: &JsonValue, path: &str) -> Result<Value, ParseError> {
    match json {
        JsonValue::String(s) => Ok(Value::String(s.to_lowercase())),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| ParseError::new("invalid number", path)),
        JsonValue::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| parse_value(v, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<Value>, ParseError>>()
            .map(Value::List),
        JsonValue::Bool(_) => Err(ParseError::new("boolean values not supported here", path)),
        JsonValue::Null => Err(ParseError::new("null values not supported", path)),
        JsonValue::Object(_) => Err(ParseError::new(
            "nested objects not supported as values",
            path,
        )),
    }
}

/// parse named condition definitions from a JSON object
///
/// definitions may reference each other in any order; cycles are rejected.
pub fn parse_definitions(json: &JsonValue) -> Result<ConditionDefinitions, ParseError> {
    let obj = json
        .as_object()
        .ok_or_else(|| ParseError::new("conditions must be an object", "conditions"))?;

    // first pass: placeholder refs so forward references parse
    let placeholders: ConditionDefinitions = obj
        .keys()
        .map(|name| (name.clone(), Condition::Ref(name.clone())))
        .collect();

    let mut raw = ConditionDefinitions::new();
    for (name, value) in obj {
        let condition =
            parse_condition_internal(value, &placeholders, &format!("conditions.{}", name))?;
        raw.insert(name.clone(), condition);
    }

    // second pass: resolve every placeholder, each definition once
    let mut resolver = Resolver {
        raw: &raw,
        resolved: HashMap::new(),
        visiting: HashSet::new(),
    };
    let mut definitions = ConditionDefinitions::new();
    for name in obj.keys() {
        let condition = resolver.resolve(name)?;
        definitions.insert(name.clone(), Condition::clone(&condition));
    }

    Ok(definitions)
}

struct Resolver<'a> {
    raw: &'a ConditionDefinitions,
    resolved: HashMap<String, Arc<Condition>>,
    visiting: HashSet<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, name: &str) -> Result<Arc<Condition>, ParseError> {
        if let Some(condition) = self.resolved.get(name) {
            return Ok(Arc::clone(condition));
        }

        let path = format!("conditions.{}", name);
        if !self.visiting.insert(name.to_string()) {
            return Err(ParseError::new(
                format!("circular condition reference: '{}'", name),
                path,
            ));
        }

        let raw = self.raw;
        let condition = raw.get(name).ok_or_else(|| {
            ParseError::new(format!("undefined condition reference: '{}'", name), &path)
        })?;
        let inlined = Arc::new(self.inline(condition)?);

        self.visiting.remove(name);
        self.resolved.insert(name.to_string(), Arc::clone(&inlined));
        Ok(inlined)
    }

    fn inline(&mut self, condition: &Condition) -> Result<Condition, ParseError> {
        match condition {
            Condition::All(conditions) => Ok(Condition::All(self.inline_list(conditions)?)),
            Condition::Any(conditions) => Ok(Condition::Any(self.inline_list(conditions)?)),
            Condition::Not(inner) => Ok(Condition::negate(self.inline(inner)?)),
            Condition::Field(_) | Condition::Named(..) => Ok(condition.clone()),
            Condition::Ref(name) => Ok(Condition::Named(name.clone(), self.resolve(name)?)),
        }
    }

    fn inline_list(&mut self, conditions: &[Condition]) -> Result<Vec<Condition>, ParseError> {
        conditions.iter().map(|c| self.inline(c)).collect()
    }
}
