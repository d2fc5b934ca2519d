//! Behaviour tests for the pen marker against a headless `World`.

use approx::assert_relative_eq;
use bevy::prelude::*;

use super::base::MarkerStage;
use super::path::PathMode;
use super::pen::{DrawPhase, PenMarker};
use super::settings::MarkerSettings;
use super::state::PenMarkerState;
use super::style::StyleChange;
use super::surface::{ElementAttributes, PathShape};

fn draw(world: &mut World, marker: &mut PenMarker, points: &[Vec2]) {
    let (first, rest) = points.split_first().unwrap();
    marker.pointer_down(world, *first, None);
    let (last, middle) = rest.split_last().unwrap();
    for &p in middle {
        marker.pointer_move(world, p);
    }
    marker.pointer_up(world, *last);
}

fn drawn_marker(world: &mut World, points: &[Vec2]) -> PenMarker {
    let mut marker = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    draw(world, &mut marker, points);
    marker
}

fn visible_data(world: &World, marker: &PenMarker) -> String {
    let entity = marker.visual().visible_path().unwrap();
    world.get::<PathShape>(entity).unwrap().data.clone()
}

fn visible_attributes(world: &World, marker: &PenMarker) -> ElementAttributes {
    let entity = marker.visual().visible_path().unwrap();
    world.get::<ElementAttributes>(entity).unwrap().clone()
}

fn triangle() -> Vec<Vec2> {
    vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(10.0, 0.0)]
}

#[test]
fn test_drawing_session_captures_every_point() {
    let mut world = World::new();
    let mut marker = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);

    marker.pointer_down(&mut world, Vec2::new(0.0, 0.0), None);
    assert_eq!(marker.phase(), DrawPhase::Drawing);
    assert_eq!(marker.base().stage(), MarkerStage::Creating);
    assert!(marker.visual().is_created());

    marker.pointer_move(&mut world, Vec2::new(10.0, 0.0));
    marker.pointer_move(&mut world, Vec2::new(10.0, 10.0));
    marker.pointer_up(&mut world, Vec2::new(20.0, 10.0));

    assert_eq!(
        marker.points(),
        &[
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 10.0),
        ]
    );
    assert_eq!(marker.phase(), DrawPhase::Idle);
    assert_eq!(marker.base().stage(), MarkerStage::Select);
    assert_eq!(marker.visual().handles().len(), 4);
}

#[test]
fn test_new_pointer_down_starts_fresh_stroke() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let old_group = marker.visual().container().unwrap();

    marker.pointer_down(&mut world, Vec2::new(50.0, 50.0), None);

    assert_eq!(marker.points(), &[Vec2::new(50.0, 50.0)]);
    assert!(world.get_entity(old_group).is_err());
    assert!(marker.visual().is_created());
}

#[test]
fn test_single_point_stroke_has_empty_path() {
    let mut world = World::new();
    let mut marker = PenMarker::new(&MarkerSettings::default(), PathMode::Polyline);
    marker.pointer_down(&mut world, Vec2::new(3.0, 3.0), None);
    assert!(visible_data(&world, &marker).is_empty());
}

#[test]
fn test_edit_point_replaces_point_and_refreshes_once() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let before = marker.visual().refresh_count();

    assert!(marker.edit_point(&mut world, 1, Vec2::new(6.0, 6.0)));

    assert_eq!(
        marker.points(),
        &[Vec2::new(0.0, 0.0), Vec2::new(6.0, 6.0), Vec2::new(10.0, 0.0)]
    );
    assert_eq!(marker.visual().refresh_count(), before + 1);
}

#[test]
fn test_edit_point_out_of_range_is_noop() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let before = marker.visual().refresh_count();
    let data = visible_data(&world, &marker);

    assert!(!marker.edit_point(&mut world, 5, Vec2::new(6.0, 6.0)));

    assert_eq!(marker.points(), triangle().as_slice());
    assert_eq!(marker.visual().refresh_count(), before);
    assert_eq!(visible_data(&world, &marker), data);
}

#[test]
fn test_handle_drag_edits_point() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    marker.select(&mut world);
    let handle = marker.visual().handles()[1];

    marker.pointer_down(&mut world, Vec2::new(5.0, 5.0), Some(handle));
    assert_eq!(marker.grabbed_handle(), Some(1));
    assert_eq!(marker.base().stage(), MarkerStage::Edit);

    marker.pointer_move(&mut world, Vec2::new(7.0, 7.0));
    assert_eq!(marker.points()[1], Vec2::new(7.0, 7.0));

    marker.pointer_up(&mut world, Vec2::new(8.0, 6.0));
    assert_eq!(marker.points()[1], Vec2::new(8.0, 6.0));
    assert_eq!(marker.points().len(), 3);
    assert_eq!(marker.grabbed_handle(), None);
    assert_eq!(marker.base().stage(), MarkerStage::Select);
    assert_eq!(marker.visual().handles()[1], handle);
}

#[test]
fn test_body_drag_moves_marker_without_touching_points() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    marker.select(&mut world);
    let body = marker.visual().hit_path().unwrap();

    marker.pointer_down(&mut world, Vec2::new(5.0, 5.0), Some(body));
    marker.pointer_move(&mut world, Vec2::new(8.0, 5.0));
    marker.pointer_up(&mut world, Vec2::new(10.0, 7.0));

    assert_eq!(marker.points(), triangle().as_slice());
    assert_eq!(marker.base().offset(), Vec2::new(5.0, 2.0));
    assert_eq!(marker.phase(), DrawPhase::Idle);
    let group = marker.visual().container().unwrap();
    assert_eq!(
        world.get::<Transform>(group).unwrap().translation,
        Vec3::new(5.0, 2.0, 0.0)
    );
}

#[test]
fn test_pointer_mapped_into_local_space() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    marker.select(&mut world);
    let body = marker.visual().hit_path().unwrap();
    marker.pointer_down(&mut world, Vec2::ZERO, Some(body));
    marker.pointer_up(&mut world, Vec2::new(100.0, 0.0));

    let handle = marker.visual().handles()[0];
    marker.pointer_down(&mut world, Vec2::new(100.0, 0.0), Some(handle));
    marker.pointer_up(&mut world, Vec2::new(101.0, 1.0));

    assert_eq!(marker.points()[0], Vec2::new(1.0, 1.0));
}

#[test]
fn test_decimation_skips_close_points() {
    let mut world = World::new();
    let settings = MarkerSettings {
        min_point_distance: Some(5.0),
        ..Default::default()
    };
    let mut marker = PenMarker::new(&settings, PathMode::Smoothed);
    marker.pointer_down(&mut world, Vec2::ZERO, None);
    marker.pointer_move(&mut world, Vec2::new(1.0, 0.0));
    marker.pointer_move(&mut world, Vec2::new(6.0, 0.0));
    marker.pointer_up(&mut world, Vec2::new(7.0, 0.0));

    assert_eq!(
        marker.points(),
        &[Vec2::ZERO, Vec2::new(6.0, 0.0), Vec2::new(7.0, 0.0)]
    );
}

#[test]
fn test_handles_visible_only_when_selected_and_idle() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let hidden = |world: &World, marker: &PenMarker| {
        marker
            .visual()
            .handles()
            .iter()
            .all(|&h| world.get::<ElementAttributes>(h).unwrap().is_hidden())
    };
    assert!(hidden(&world, &marker));

    marker.select(&mut world);
    assert!(marker
        .visual()
        .handles()
        .iter()
        .all(|&h| !world.get::<ElementAttributes>(h).unwrap().is_hidden()));

    marker.deselect(&mut world);
    assert!(hidden(&world, &marker));
}

#[test]
fn test_set_stroke_width_only_changes_width() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let data = visible_data(&world, &marker);
    let before = visible_attributes(&world, &marker);

    marker.set_stroke_width(&mut world, 8.0);

    assert_eq!(marker.points(), triangle().as_slice());
    assert_eq!(visible_data(&world, &marker), data);
    let after = visible_attributes(&world, &marker);
    assert_eq!(after.get("stroke-width"), Some("8"));
    assert_eq!(after.get("stroke"), before.get("stroke"));
    assert_eq!(after.get("stroke-dasharray"), before.get("stroke-dasharray"));
}

#[test]
fn test_invalid_stroke_width_is_ignored() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let before = marker.visual().refresh_count();
    marker.set_stroke_width(&mut world, 0.0);
    assert_eq!(marker.style().stroke_width, MarkerSettings::default().default_stroke_width);
    assert_eq!(marker.visual().refresh_count(), before);
}

#[test]
fn test_style_changes_reach_visible_path() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    marker.apply_style_change(&mut world, &StyleChange::StrokeColor("#00ff00".to_string()));
    marker.apply_style_change(&mut world, &StyleChange::StrokeDasharray(Some("4 2".to_string())));

    let attrs = visible_attributes(&world, &marker);
    assert_eq!(attrs.get("stroke"), Some("#00ff00"));
    assert_eq!(attrs.get("stroke-dasharray"), Some("4 2"));

    let panels = marker.toolbox_panels(&MarkerSettings::default());
    assert_eq!(panels.len(), 3);
}

#[test]
fn test_state_roundtrip() {
    let mut world = World::new();
    let mut original = drawn_marker(&mut world, &triangle());
    original.set_stroke_color(&mut world, "blue");
    original.set_stroke_dasharray(&mut world, Some("3".to_string()));
    original.set_notes(Some("left edge".to_string()));
    let state = original.get_state();

    let mut restored = PenMarker::new(&MarkerSettings::default(), PathMode::Polyline);
    assert!(restored.restore_state(&mut world, &state));

    assert_eq!(restored.get_state(), state);
    assert_eq!(restored.points(), original.points());
    assert_eq!(restored.path_mode(), PathMode::Smoothed);
    assert_eq!(visible_data(&world, &restored), visible_data(&world, &original));
    assert_eq!(restored.visual().handles().len(), 3);
}

#[test]
fn test_state_roundtrip_without_points() {
    let mut world = World::new();
    let original = PenMarker::new(&MarkerSettings::default(), PathMode::Polyline);
    let state = original.get_state();
    assert!(state.points.is_empty());

    let mut restored = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    assert!(restored.restore_state(&mut world, &state));

    assert_eq!(restored.get_state(), state);
    assert!(restored.points().is_empty());
    assert!(restored.visual().handles().is_empty());
    assert_eq!(visible_data(&world, &restored), "");
}

#[test]
fn test_state_roundtrip_single_point() {
    let mut world = World::new();
    let mut original = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    original.pointer_down(&mut world, Vec2::new(4.0, 7.0), None);
    let state = original.get_state();
    assert_eq!(state.point_vec(), vec![Vec2::new(4.0, 7.0)]);
    assert_eq!(state.base.stage, MarkerStage::Select);

    let mut restored = PenMarker::new(&MarkerSettings::default(), PathMode::Polyline);
    assert!(restored.restore_state(&mut world, &state));

    assert_eq!(restored.get_state(), state);
    assert_eq!(restored.phase(), DrawPhase::Idle);
    assert_eq!(restored.points(), &[Vec2::new(4.0, 7.0)]);
    assert_eq!(restored.visual().handles().len(), original.visual().handles().len());
    assert_eq!(visible_data(&world, &restored), "");
}

#[test]
fn test_pointer_down_while_drawing_keeps_points() {
    let mut world = World::new();
    let mut marker = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    marker.pointer_down(&mut world, Vec2::new(0.0, 0.0), None);
    marker.pointer_move(&mut world, Vec2::new(5.0, 5.0));
    marker.pointer_move(&mut world, Vec2::new(10.0, 0.0));

    let body = marker.visual().hit_path().unwrap();
    marker.select(&mut world);
    marker.pointer_down(&mut world, Vec2::new(5.0, 4.0), Some(body));
    marker.pointer_up(&mut world, Vec2::new(5.0, 4.0));

    assert_eq!(marker.phase(), DrawPhase::Idle);
    assert_eq!(marker.points(), triangle().as_slice());
    assert_eq!(marker.base().stage(), MarkerStage::Select);
}

#[test]
fn test_state_roundtrip_through_json() {
    let mut world = World::new();
    let original = drawn_marker(&mut world, &triangle());
    let json = serde_json::to_string(&original.get_state()).unwrap();
    let state: PenMarkerState = serde_json::from_str(&json).unwrap();

    let mut restored = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    assert!(restored.restore_state(&mut world, &state));
    assert_eq!(restored.get_state(), original.get_state());
}

#[test]
fn test_restore_rejects_foreign_type() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let before = marker.get_state();
    let mut foreign = before.clone();
    foreign.type_name = "EllipseMarker".to_string();
    foreign.points.clear();

    assert!(!marker.restore_state(&mut world, &foreign));
    assert_eq!(marker.get_state(), before);
}

#[test]
fn test_scale_inverse() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    marker.scale(&mut world, 2.0, 3.0);
    assert_eq!(marker.points()[1], Vec2::new(10.0, 15.0));

    marker.scale(&mut world, 0.5, 1.0 / 3.0);
    for (actual, expected) in marker.points().iter().zip(triangle()) {
        assert_relative_eq!(actual.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(actual.y, expected.y, epsilon = 1e-4);
    }
}

#[test]
fn test_scale_ignores_degenerate_factors() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    marker.scale(&mut world, 0.0, 2.0);
    marker.scale(&mut world, f32::INFINITY, 1.0);
    marker.scale(&mut world, 1.0, f32::NAN);
    assert_eq!(marker.points(), triangle().as_slice());
}

#[test]
fn test_scale_commutes_with_restore() {
    let mut world = World::new();
    let mut original = drawn_marker(&mut world, &triangle());
    original.select(&mut world);
    let body = original.visual().hit_path().unwrap();
    original.pointer_down(&mut world, Vec2::ZERO, Some(body));
    original.pointer_up(&mut world, Vec2::new(4.0, 6.0));
    let state = original.get_state();

    let mut restored_then_scaled = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    restored_then_scaled.restore_state(&mut world, &state);
    restored_then_scaled.scale(&mut world, 1.5, 0.5);

    let mut scaled_then_restored = PenMarker::new(&MarkerSettings::default(), PathMode::Smoothed);
    scaled_then_restored.restore_state(&mut world, &state.scaled(1.5, 0.5));

    let a = restored_then_scaled.get_state();
    let b = scaled_then_restored.get_state();
    assert_eq!(a.points.len(), b.points.len());
    for (pa, pb) in a.points.iter().zip(&b.points) {
        assert_relative_eq!(pa.x, pb.x, epsilon = 1e-5);
        assert_relative_eq!(pa.y, pb.y, epsilon = 1e-5);
    }
    assert_relative_eq!(a.base.offset.x, b.base.offset.x, epsilon = 1e-5);
    assert_relative_eq!(a.base.offset.y, b.base.offset.y, epsilon = 1e-5);
    assert_eq!(a.stroke_width, b.stroke_width);
}

#[test]
fn test_owns_target_and_destroy() {
    let mut world = World::new();
    let mut marker = drawn_marker(&mut world, &triangle());
    let other = drawn_marker(&mut world, &triangle());
    let visible = marker.visual().visible_path().unwrap();

    assert!(marker.owns_target(visible));
    assert!(marker.owns_target(marker.visual().handles()[2]));
    assert!(!marker.owns_target(other.visual().visible_path().unwrap()));

    marker.destroy(&mut world);
    assert!(!marker.owns_target(visible));
    assert!(world.get_entity(visible).is_err());
    assert_eq!(marker.points(), triangle().as_slice());
}
