// integration tests for loading layout files into controllers

use crate::common::*;

use ruleframe::config::{self, LayoutFileError};
use ruleframe::{LayoutHost, Rect, Size};

#[test]
fn test_sample_layout_places_children() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let layout = config::load(&path).unwrap();

    let mut controller = layout.build(None).unwrap();
    controller.layout_control();

    let host = controller.host();
    let frame = |name: &str| host.find(name).and_then(|id| host.frame(id));
    assert_eq!(frame("content"), Some(Rect::new(200.0, 0.0, 600.0, 600.0)));
    assert_eq!(frame("sidebar"), Some(Rect::new(0.0, 0.0, 200.0, 600.0)));
    assert_eq!(frame("overlay"), None);
}

#[test]
fn test_sample_layout_narrow_and_large_sizes() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let layout = config::load(&path).unwrap();

    let mut narrow = layout.build(Some(Size::new(400.0, 300.0))).unwrap();
    narrow.layout_control();
    let host = narrow.host();
    let sidebar = host.find("sidebar").unwrap();
    assert_eq!(host.frame(sidebar), Some(Rect::new(0.0, 0.0, 400.0, 300.0)));

    let mut large = layout.build(Some(Size::new(1600.0, 1000.0))).unwrap();
    large.layout_control();
    let host = large.host();
    let overlay = host.find("overlay").unwrap();
    assert_eq!(
        host.frame(overlay),
        Some(Rect::new(1490.0, 940.0, 100.0, 50.0))
    );
}

#[test]
fn test_sample_layout_order() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let mut controller = config::load(&path).unwrap().build(None).unwrap();
    controller.reload_subviews();

    let host = controller.host();
    let names: Vec<_> = host
        .subviews()
        .into_iter()
        .filter_map(|id| host.name(id))
        .collect();
    assert_eq!(names, vec!["overlay", "content", "sidebar"]);
}

#[test]
fn test_json5_layout() {
    let content = r#"{
        // anchored badge, only on wide containers
        container: { width: 1024, height: 768 },
        children: [
            {
                id: 'badge',
                rules: [
                    { when: { width: { '>=': 1000 } }, position: '64x64@top-right+8,8' },
                ],
            },
        ],
    }"#;
    let (_dir, path) = write_layout("layout.json5", content);

    let mut controller = config::load(&path).unwrap().build(None).unwrap();
    controller.layout_control();

    let host = controller.host();
    let badge = host.find("badge").unwrap();
    assert_eq!(host.frame(badge), Some(Rect::new(952.0, 8.0, 64.0, 64.0)));
}

#[test]
fn test_unresolved_reference_is_rejected() {
    let content = r#"{
      "children": [ { "id": "a", "rules": [ { "when": "$missing", "position": "full" } ] } ]
    }"#;
    let (_dir, path) = write_layout("layout.json", content);

    let err = config::load(&path).unwrap().build(None).err().unwrap();
    assert!(matches!(err, LayoutFileError::Condition(_)));
    assert!(err.to_string().contains("missing"), "{}", err);
}

#[test]
fn test_invalid_json_reports_path() {
    let (_dir, path) = write_layout("broken.json", "{ \"children\": [ ");
    let err = config::load(&path).unwrap_err();
    assert!(matches!(err, LayoutFileError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}
