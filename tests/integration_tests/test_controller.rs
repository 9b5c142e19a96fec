// integration tests for the layout controller against a host defined outside the crate

use std::collections::HashMap;

use ruleframe::conditions::{parse_condition, ConditionDefinitions, LayoutCondition};
use ruleframe::{
    Anchor, LayoutController, LayoutHost, LayoutPosition, LayoutRule, Length, Point, Rect, Size,
};
use serde_json::json;

/// host keyed by name, recording every call in order
#[derive(Default)]
struct RecordingHost {
    size: Size,
    children: Vec<&'static str>,
    placed: HashMap<&'static str, (Size, Point)>,
    calls: Vec<String>,
}

impl RecordingHost {
    fn new(size: Size, children: &[&'static str]) -> Self {
        Self {
            size,
            children: children.to_vec(),
            ..Default::default()
        }
    }
}

impl LayoutHost for RecordingHost {
    type Child = &'static str;

    fn bound_size(&self) -> Size {
        self.size
    }

    fn subviews(&self) -> Vec<&'static str> {
        self.children.clone()
    }

    fn add_subview(&mut self, child: &&'static str) {
        self.calls.push(format!("add {}", child));
        self.children.push(*child);
    }

    fn remove_subview(&mut self, child: &&'static str) {
        self.calls.push(format!("remove {}", child));
        self.children.retain(|c| c != child);
    }

    fn place(&mut self, child: &&'static str, size: Size, center: Point) {
        self.calls.push(format!("place {}", child));
        self.placed.insert(*child, (size, center));
    }
}

fn points(value: f64) -> Length {
    Length::Points(value)
}

#[test]
fn test_first_matching_rule_wins_across_resizes() {
    let host = RecordingHost::new(Size::new(80.0, 100.0), &["a"]);
    let mut controller = LayoutController::new(host);

    let small = LayoutPosition::frame(Anchor::TopLeft, points(10.0), points(10.0));
    controller.set_layout(&"a", small, |size| size.width < 50.0);
    controller.append_constant_position(&"a", LayoutPosition::full());

    controller.layout_control();
    assert_eq!(
        controller.host().placed["a"],
        (Size::new(80.0, 100.0), Point::new(40.0, 50.0))
    );

    controller.host_mut().size = Size::new(40.0, 100.0);
    controller.layout_control();
    assert_eq!(
        controller.host().placed["a"],
        (Size::new(10.0, 10.0), Point::new(5.0, 5.0))
    );
}

#[test]
fn test_reload_detaches_all_then_attaches_in_z_order() {
    let host = RecordingHost::new(Size::new(100.0, 100.0), &["top", "bottom", "plain"]);
    let mut controller = LayoutController::new(host);
    controller.set_z_index(&"top", 5);
    controller.set_z_index(&"bottom", -1);

    controller.reload_subviews();

    assert_eq!(controller.host().children, vec!["bottom", "plain", "top"]);
    assert_eq!(
        controller.host().calls,
        vec![
            "remove top",
            "remove bottom",
            "remove plain",
            "add bottom",
            "add plain",
            "add top",
        ]
    );
}

#[test]
fn test_layout_control_skips_unmatched_children() {
    let host = RecordingHost::new(Size::new(100.0, 100.0), &["a", "b", "c"]);
    let mut controller = LayoutController::new(host);
    controller.set_constant_position(&"a", LayoutPosition::full());
    controller.set_layout(&"b", LayoutPosition::full(), |size| size.height > 500.0);

    controller.layout_control();

    assert_eq!(controller.host().calls, vec!["place a"]);
}

#[test]
fn test_expression_conditions_drive_rules() {
    let mut definitions = ConditionDefinitions::new();
    definitions.insert(
        "portrait".to_string(),
        parse_condition(&json!({ "orientation": "portrait" }), &ConditionDefinitions::new())
            .unwrap(),
    );
    let compact = parse_condition(
        &json!({ "any": ["$portrait", { "width": { "<": 400 } }] }),
        &definitions,
    )
    .unwrap();

    let host = RecordingHost::new(Size::new(300.0, 200.0), &["toolbar"]);
    let mut controller = LayoutController::new(host);
    controller.set_rules(
        &"toolbar",
        vec![
            LayoutRule::new(
                compact,
                LayoutPosition::frame(Anchor::Bottom, Length::FULL, points(44.0)),
            ),
            LayoutRule::new(
                LayoutCondition::Always,
                LayoutPosition::frame(Anchor::Top, Length::FULL, points(32.0)),
            ),
        ],
    );

    let size = controller.host().bound_size();
    assert_eq!(controller.layout_info().matching_index(&"toolbar", size), Some(0));

    controller.host_mut().size = Size::new(900.0, 600.0);
    controller.layout_control();
    assert_eq!(
        controller.host().placed["toolbar"],
        (Size::new(900.0, 32.0), Point::new(450.0, 16.0))
    );
}

#[test]
fn test_custom_position_receives_container_size() {
    let host = RecordingHost::new(Size::new(120.0, 60.0), &["square"]);
    let mut controller = LayoutController::new(host);

    let square = LayoutPosition::custom(|size: Size| {
        let side = size.width.min(size.height);
        Rect::new(0.0, 0.0, side, side)
    });
    controller.set_constant_position(&"square", square);
    controller.layout_control();

    assert_eq!(
        controller.host().placed["square"],
        (Size::new(60.0, 60.0), Point::new(30.0, 30.0))
    );
}

#[test]
fn test_refresh_prunes_removed_children_only() {
    let host = RecordingHost::new(Size::new(100.0, 100.0), &["a", "b"]);
    let mut controller = LayoutController::new(host);
    controller.set_constant_position(&"a", LayoutPosition::full());
    controller.set_constant_position(&"b", LayoutPosition::full());
    controller.set_z_index(&"a", 3);

    controller.host_mut().remove_subview(&"a");
    controller.refresh_layout_info();
    controller.refresh_z_index_info();

    assert!(!controller.layout_info().contains(&"a"));
    assert!(controller.layout_info().contains(&"b"));
    assert!(controller.z_index_info().is_empty());

    // refreshing again changes nothing for the live child
    controller.refresh_layout_info();
    let size = controller.host().bound_size();
    assert_eq!(
        controller.layout_info().evaluate(&"b", size),
        Some(&LayoutPosition::full())
    );
}
