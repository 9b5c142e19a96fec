// library crate for ruleframe
// the layout core (conditions, positions, rules, z-index, controller) plus the
// layout file loader and CLI used by the binaries

pub mod cli;
pub mod conditions;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod position;
pub mod rules;
pub mod zindex;

pub use conditions::{Condition, LayoutCondition};
pub use controller::{LayoutController, LayoutHost, MemoryContainer, ViewId};
pub use geometry::{Point, Rect, Size};
pub use position::{Anchor, Insets, Length, LayoutPosition};
pub use rules::{LayoutRule, RuleTable};
pub use zindex::ZIndexTable;
