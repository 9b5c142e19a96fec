//! layout controller - applies rule tables to a host container
//!
//! the host owns the real view tree (sizes, child list, attach/detach); the
//! controller owns the rule and z-index tables and drives two passes:
//! - `layout_control` places every child whose rules match the current size
//! - `reload_subviews` re-attaches children in z-index order
//!
//! everything runs synchronously on the caller's thread. `&mut self` on every
//! mutation keeps configuration and layout passes from interleaving.

mod memory;

pub use memory::{MemoryContainer, ViewId};

use std::hash::Hash;

use crate::conditions::LayoutCondition;
use crate::geometry::{Point, Rect, Size};
use crate::position::LayoutPosition;
use crate::rules::{LayoutRule, RuleTable};
use crate::zindex::ZIndexTable;

/// the container side of the boundary, implemented by the GUI toolkit
pub trait LayoutHost {
    /// stable handle identifying one child; equal handles mean the same child
    type Child: Clone + Eq + Hash;

    /// current bounds of the container
    fn bound_size(&self) -> Size;

    /// live children in attach order (first = bottom-most)
    fn subviews(&self) -> Vec<Self::Child>;

    /// attach a child on top of the existing ones
    fn add_subview(&mut self, child: &Self::Child);

    fn remove_subview(&mut self, child: &Self::Child);

    /// apply a resolved frame by setting the child's bounds size and center
    fn place(&mut self, child: &Self::Child, size: Size, center: Point);
}

pub struct LayoutController<H: LayoutHost> {
    host: H,
    layout_info: RuleTable<H::Child>,
    z_index_info: ZIndexTable<H::Child>,
}

impl<H: LayoutHost> LayoutController<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            layout_info: RuleTable::new(),
            z_index_info: ZIndexTable::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn layout_info(&self) -> &RuleTable<H::Child> {
        &self.layout_info
    }

    pub fn z_index_info(&self) -> &ZIndexTable<H::Child> {
        &self.z_index_info
    }

    pub fn add_subview(&mut self, child: &H::Child) {
        self.host.add_subview(child);
    }

    // ==================== Configuration ====================

    pub fn set_rules(&mut self, child: &H::Child, rules: Vec<LayoutRule>) {
        self.layout_info.set_rules(child.clone(), rules);
    }

    pub fn append_rule(&mut self, child: &H::Child, rule: LayoutRule) {
        self.layout_info.append_rule(child.clone(), rule);
    }

    pub fn set_constant_position(&mut self, child: &H::Child, position: LayoutPosition) {
        self.layout_info.set_constant_position(child.clone(), position);
    }

    /// appends an always-true rule; rules appended after it never win
    pub fn append_constant_position(&mut self, child: &H::Child, position: LayoutPosition) {
        self.layout_info
            .append_constant_position(child.clone(), position);
    }

    /// append a rule placing `child` at `position` while `condition` holds
    pub fn set_layout<F>(&mut self, child: &H::Child, position: LayoutPosition, condition: F)
    where
        F: Fn(Size) -> bool + Send + Sync + 'static,
    {
        let rule = LayoutRule::new(LayoutCondition::predicate(condition), position);
        self.append_rule(child, rule);
    }

    pub fn set_z_index(&mut self, child: &H::Child, z_index: i32) {
        self.z_index_info.set_z_index(child.clone(), z_index);
    }

    // ==================== Passes ====================

    /// frame each live child would get at the current size, `None` when no rule matches
    pub fn resolve_frames(&self) -> Vec<(H::Child, Option<Rect>)> {
        let size = self.host.bound_size();
        self.host
            .subviews()
            .into_iter()
            .map(|child| {
                let frame = self
                    .layout_info
                    .evaluate(&child, size)
                    .map(|position| position.resolve(size));
                (child, frame)
            })
            .collect()
    }

    /// place every live child whose rules match; the rest are left untouched
    pub fn layout_control(&mut self) {
        let size = self.host.bound_size();
        let mut placed = 0usize;
        let mut skipped = 0usize;

        for (child, frame) in self.resolve_frames() {
            match frame {
                Some(rect) => {
                    self.host.place(&child, rect.size, rect.center());
                    placed += 1;
                }
                None => skipped += 1,
            }
        }

        tracing::debug!(%size, placed, skipped, "layout pass");
    }

    /// re-attach live children sorted by z-index (stable, ascending)
    pub fn reload_subviews(&mut self) {
        let subviews = self.host.subviews();
        let ordered = self.z_index_info.ordered_by_z_index(&subviews);

        for child in &subviews {
            self.host.remove_subview(child);
        }
        for child in &ordered {
            self.host.add_subview(child);
        }

        tracing::debug!(children = ordered.len(), "reloaded subviews");
    }

    pub fn refresh_layout_info(&mut self) {
        let live = self.host.subviews();
        self.layout_info.refresh(&live);
    }

    pub fn refresh_z_index_info(&mut self) {
        let live = self.host.subviews();
        self.z_index_info.refresh(&live);
    }
}
