//! in-memory container used by the CLI and tests

use std::collections::HashMap;
use std::fmt;

use super::LayoutHost;
use crate::geometry::{Point, Rect, Size};

/// handle assigned when a view is created; never reused within a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct View {
    name: String,
    frame: Option<Rect>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    size: Size,
    next_id: u64,
    views: HashMap<ViewId, View>,
    attached: Vec<ViewId>,
}

impl MemoryContainer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// create a view and attach it on top; names are labels, not identity
    pub fn create_view(&mut self, name: impl Into<String>) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.views.insert(
            id,
            View {
                name: name.into(),
                frame: None,
            },
        );
        self.attached.push(id);
        id
    }

    pub fn set_bound_size(&mut self, size: Size) {
        self.size = size;
    }

    /// frame last applied through `place`, kept while the view is detached
    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.views.get(&id).and_then(|v| v.frame)
    }

    pub fn name(&self, id: ViewId) -> Option<&str> {
        self.views.get(&id).map(|v| v.name.as_str())
    }

    /// first view created with this name
    pub fn find(&self, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .filter(|(_, v)| v.name == name)
            .map(|(id, _)| *id)
            .min()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut ids: Vec<&ViewId> = self.views.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| self.name(*id))
            .collect()
    }

    pub fn is_attached(&self, id: ViewId) -> bool {
        self.attached.contains(&id)
    }
}

impl LayoutHost for MemoryContainer {
    type Child = ViewId;

    fn bound_size(&self) -> Size {
        self.size
    }

    fn subviews(&self) -> Vec<ViewId> {
        self.attached.clone()
    }

    /// attaching an attached view moves it to the top
    fn add_subview(&mut self, child: &ViewId) {
        if !self.views.contains_key(child) {
            tracing::warn!("ignoring attach of unknown view {}", child);
            return;
        }
        self.attached.retain(|id| id != child);
        self.attached.push(*child);
    }

    fn remove_subview(&mut self, child: &ViewId) {
        self.attached.retain(|id| id != child);
    }

    fn place(&mut self, child: &ViewId, size: Size, center: Point) {
        if let Some(view) = self.views.get_mut(child) {
            view.frame = Some(Rect::from_center(center, size));
        }
    }
}
