use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::geometry::Size;

/// on-disk description of one container and its children
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutFile {
    /// container size used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Size>,
    /// named conditions, referenced from rules as "$name" or { "$ref": "name" }
    #[serde(default, skip_serializing_if = "is_empty_object")]
    pub conditions: JsonValue,
    #[serde(default)]
    pub children: Vec<ChildSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub z_index: i32,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// one rule; a missing `when` means always
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<JsonValue>,
    pub position: JsonValue,
}

fn is_empty_object(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}
