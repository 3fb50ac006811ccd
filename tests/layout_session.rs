use std::fs;

use dockboard::{
    dock::DockLayout,
    files::FilesService,
    layout::{LayoutDocument, LayoutPreset, LayoutSession},
    widgets::WidgetKind,
};
use pretty_assertions::assert_eq;
use ratatui::layout::Rect;
use strum::IntoEnumIterator;

fn session() -> LayoutSession {
    let mut session = LayoutSession::default();
    session.initialize_layout(Rect::new(0, 1, 100, 28));
    session
}

fn engine(session: &LayoutSession) -> &DockLayout {
    session.engine().expect("initialized")
}

fn pane_summary(session: &LayoutSession) -> Vec<(String, String, bool)> {
    engine(session)
        .panes()
        .iter()
        .map(|pane| {
            (
                pane.component_type().to_string(),
                pane.title().to_string(),
                pane.is_mounted(),
            )
        })
        .collect()
}

#[test]
fn test_saved_layout_restores_in_fresh_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = FilesService::new(dir.path());

    let mut original = session();
    original.add_widget(WidgetKind::Table);
    original.add_widget(WidgetKind::PieGraph);
    original.add_widget(WidgetKind::Table);
    let path = original
        .save_layout(&files)
        .expect("save")
        .expect("initialized");
    assert_eq!(path, dir.path().join("layout-config.json"));

    let text = fs::read_to_string(&path).expect("read");
    let document: LayoutDocument = serde_json::from_str(&text).expect("document");
    assert_eq!(
        document.imported_components,
        vec!["tableComponent", "pieGraph"]
    );

    let mut restored = session();
    assert!(restored.load_document(document));
    assert_eq!(pane_summary(&restored), pane_summary(&original));
    assert!(pane_summary(&restored).iter().all(|(_, _, mounted)| *mounted));
}

#[test]
fn test_second_save_does_not_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = FilesService::new(dir.path());
    let mut session = session();
    session.add_widget(WidgetKind::Tree);

    let first = session.save_layout(&files).expect("save");
    let second = session.save_layout(&files).expect("save");
    assert_eq!(first, Some(dir.path().join("layout-config.json")));
    assert_eq!(second, Some(dir.path().join("layout-config (1).json")));
}

#[test]
fn test_raw_load_without_registration_leaves_panes_empty() {
    let mut session = session();
    let document: LayoutDocument =
        serde_json::from_str(LayoutPreset::Row.contents()).expect("preset");

    assert!(session.load_layout(document.layout_data.clone()));
    let summary = pane_summary(&session);
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|(_, _, mounted)| !mounted));
    assert!(session.registered().is_empty());

    // Registering afterwards does not mount panes that already exist.
    session.load_document(LayoutDocument {
        imported_components: document.imported_components.clone(),
        layout_data: serde_json::json!({ "resolved": false }),
    });
    assert_eq!(session.registered().len(), 3);
    assert!(pane_summary(&session).iter().all(|(_, _, mounted)| !mounted));

    assert!(session.load_layout(document.layout_data));
    assert!(pane_summary(&session).iter().all(|(_, _, mounted)| *mounted));
}

#[test]
fn test_every_preset_loads() {
    for preset in LayoutPreset::iter() {
        let mut session = session();
        let document: LayoutDocument =
            serde_json::from_str(preset.contents()).expect("preset");
        let expected = document.imported_components.len();

        assert!(session.load_document(document), "{preset}");
        let summary = pane_summary(&session);
        assert!(summary.len() >= expected, "{preset}");
        assert!(summary.iter().all(|(_, _, mounted)| *mounted), "{preset}");
        assert!(engine(&session).focused().is_some(), "{preset}");
    }
}

#[test]
fn test_clear_keeps_registrations_for_later_loads() {
    let mut session = session();
    session.add_widget(WidgetKind::VerticalGraph);
    let saved = session.current_document().expect("initialized");

    session.clear_layout();
    assert!(engine(&session).panes().is_empty());
    assert_eq!(session.registered().to_vec(), vec!["verticalGraph"]);

    assert!(session.load_layout(saved.layout_data));
    assert_eq!(
        pane_summary(&session),
        vec![(
            "verticalGraph".to_string(),
            "Vertical Graph".to_string(),
            true
        )]
    );
}

#[test]
fn test_state_changes_resize_engine_to_window() {
    let mut session = session();
    session.on_window_resize(120, 40);
    session.add_widget(WidgetKind::Test);
    assert!(session.sync_state());
    assert_eq!(engine(&session).size(), (120, 38));
    assert!(!session.sync_state());
}

#[test]
fn test_logical_names_round_trip() {
    for kind in WidgetKind::iter() {
        assert_eq!(
            WidgetKind::from_logical_name(&kind.logical_name()),
            Some(kind)
        );
    }
}
