mod schema;

pub use schema::{ChildSpec, LayoutFile, RuleSpec};

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::conditions::{
    parse_condition_at, parse_definitions, ConditionDefinitions, LayoutCondition, ParseError,
};
use crate::controller::{LayoutController, MemoryContainer};
use crate::geometry::Size;
use crate::position::{LayoutPosition, PositionError};
use crate::rules::LayoutRule;

pub const LAYOUT_ENV_VAR: &str = "RULEFRAME_LAYOUT";

#[derive(Debug, Error)]
pub enum LayoutFileError {
    #[error("failed to read layout file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layout file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse layout file {}: {source}", .path.display())]
    Json5 {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    #[error("invalid condition at {0}")]
    Condition(#[from] ParseError),

    #[error("{path}: {source}")]
    Position {
        path: String,
        #[source]
        source: PositionError,
    },

    #[error("children[{index}]: duplicate child id '{id}'")]
    DuplicateId { index: usize, id: String },

    #[error("children[{0}]: child id must not be empty")]
    EmptyId(usize),

    #[error("container: width and height must be finite and non-negative, got {0}")]
    InvalidContainer(Size),
}

/// problems found by `verify`; warnings do not make a file invalid
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// a child with its rules parsed and ready to install
#[derive(Debug, Clone)]
pub struct CompiledChild {
    pub id: String,
    pub z_index: i32,
    pub rules: Vec<LayoutRule>,
}

/// resolve the layout file path: explicit flag, then env var, then ~/.ruleframe/layout.json
pub fn layout_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(path) = env::var(LAYOUT_ENV_VAR) {
        return PathBuf::from(path);
    }

    dirs::home_dir()
        .map(|home| home.join(".ruleframe"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("layout.json")
}

/// read and parse a layout file; `.json5` files use the JSON5 parser
pub fn load(path: &Path) -> Result<LayoutFile, LayoutFileError> {
    let content = fs::read_to_string(path).map_err(|source| LayoutFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json5 = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);

    let file = if is_json5 {
        json5::from_str(&content).map_err(|source| LayoutFileError::Json5 {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&content).map_err(|source| LayoutFileError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    tracing::debug!(path = %path.display(), "loaded layout file");
    Ok(file)
}

impl LayoutFile {
    pub fn definitions(&self) -> Result<ConditionDefinitions, ParseError> {
        if self.conditions.is_null() {
            return Ok(ConditionDefinitions::new());
        }
        parse_definitions(&self.conditions)
    }

    /// parse every child's rules, stopping at the first error
    pub fn compile(&self) -> Result<Vec<CompiledChild>, LayoutFileError> {
        check_container(self.container)?;
        let definitions = self.definitions()?;

        let mut seen = HashSet::new();
        self.children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                check_id(index, child, &mut seen)?;
                compile_child(index, child, &definitions)
            })
            .collect()
    }

    /// build a controller over an in-memory container, children attached in file order
    pub fn build(
        &self,
        size: Option<Size>,
    ) -> Result<LayoutController<MemoryContainer>, LayoutFileError> {
        let children = self.compile()?;
        let size = size.or(self.container).unwrap_or(Size::ZERO);

        let mut container = MemoryContainer::new(size);
        let ids: Vec<_> = children
            .iter()
            .map(|child| container.create_view(child.id.clone()))
            .collect();

        let mut controller = LayoutController::new(container);
        for (view, child) in ids.iter().zip(children) {
            if child.z_index != 0 {
                controller.set_z_index(view, child.z_index);
            }
            if !child.rules.is_empty() {
                controller.set_rules(view, child.rules);
            }
        }

        Ok(controller)
    }

    /// collect every problem in the file instead of stopping at the first
    pub fn verify(&self) -> VerifyReport {
        let mut report = VerifyReport::default();

        if let Err(e) = check_container(self.container) {
            report.errors.push(e.to_string());
        }

        let definitions = match self.definitions() {
            Ok(defs) => defs,
            Err(e) => {
                report.errors.push(e.to_string());
                ConditionDefinitions::new()
            }
        };

        let mut seen = HashSet::new();
        for (index, child) in self.children.iter().enumerate() {
            if let Err(e) = check_id(index, child, &mut seen) {
                report.errors.push(e.to_string());
            }

            if child.rules.is_empty() {
                report.warnings.push(format!(
                    "children[{}] '{}': no rules, the child is never placed",
                    index, child.id
                ));
            }

            let mut shadowed_by = None;
            for (rule_index, rule) in child.rules.iter().enumerate() {
                match compile_rule(index, rule_index, rule, &definitions) {
                    Ok(compiled) => {
                        if let Some(first) = shadowed_by {
                            report.warnings.push(format!(
                                "children[{}].rules[{}]: unreachable, rules[{}] always matches",
                                index, rule_index, first
                            ));
                        } else if compiled.condition.is_always() {
                            shadowed_by = Some(rule_index);
                        }
                    }
                    Err(e) => report.errors.push(e.to_string()),
                }
            }
        }

        report
    }
}

fn check_container(container: Option<Size>) -> Result<(), LayoutFileError> {
    match container {
        Some(size) if !is_valid_length(size.width) || !is_valid_length(size.height) => {
            Err(LayoutFileError::InvalidContainer(size))
        }
        _ => Ok(()),
    }
}

fn is_valid_length(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn check_id(
    index: usize,
    child: &ChildSpec,
    seen: &mut HashSet<String>,
) -> Result<(), LayoutFileError> {
    if child.id.trim().is_empty() {
        return Err(LayoutFileError::EmptyId(index));
    }
    if !seen.insert(child.id.clone()) {
        return Err(LayoutFileError::DuplicateId {
            index,
            id: child.id.clone(),
        });
    }
    Ok(())
}

fn compile_child(
    index: usize,
    child: &ChildSpec,
    definitions: &ConditionDefinitions,
) -> Result<CompiledChild, LayoutFileError> {
    let rules = child
        .rules
        .iter()
        .enumerate()
        .map(|(rule_index, rule)| compile_rule(index, rule_index, rule, definitions))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledChild {
        id: child.id.clone(),
        z_index: child.z_index,
        rules,
    })
}

fn compile_rule(
    index: usize,
    rule_index: usize,
    rule: &RuleSpec,
    definitions: &ConditionDefinitions,
) -> Result<LayoutRule, LayoutFileError> {
    let path = format!("children[{}].rules[{}]", index, rule_index);

    let condition = match &rule.when {
        None => LayoutCondition::Always,
        Some(when) => {
            let when_path = format!("{}.when", path);
            LayoutCondition::Expr(parse_condition_at(when, definitions, &when_path)?)
        }
    };

    let position =
        LayoutPosition::from_json(&rule.position).map_err(|source| LayoutFileError::Position {
            path: format!("{}.position", path),
            source,
        })?;

    Ok(LayoutRule::new(condition, position))
}
