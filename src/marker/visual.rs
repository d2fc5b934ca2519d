//! Keeps a marker's rendered elements in step with its model.
//!
//! This is the only code that creates, mutates or removes the entities
//! behind a marker. Callers pass a [`VisualSnapshot`] borrowed from the
//! model for each call; nothing here holds on to the point buffer.

use bevy::prelude::*;

use super::path::{generate_path, PathMode};
use super::settings::MarkerSettings;
use super::style::Style;
use super::surface::{Attributes, DrawingSurface};

/// Read-only view of everything a refresh needs.
#[derive(Debug, Clone, Copy)]
pub struct VisualSnapshot<'a> {
    pub points: &'a [Vec2],
    pub mode: PathMode,
    pub style: &'a Style,
    pub transform: Transform,
    pub show_handles: bool,
}

#[derive(Debug, Clone)]
pub struct VisualSynchronizer {
    container: Option<Entity>,
    visible_path: Option<Entity>,
    hit_path: Option<Entity>,
    /// Handle entity for each point index
    handles: Vec<Entity>,
    editable_handles: bool,
    handle_radius: f32,
    hit_padding: f32,
    refresh_count: u64,
}

impl VisualSynchronizer {
    pub fn new(settings: &MarkerSettings) -> Self {
        Self {
            container: None,
            visible_path: None,
            hit_path: None,
            handles: Vec::new(),
            editable_handles: settings.editable_handles,
            handle_radius: settings.handle_radius,
            hit_padding: settings.hit_padding,
            refresh_count: 0,
        }
    }

    pub fn is_created(&self) -> bool {
        self.container.is_some()
    }

    pub fn container(&self) -> Option<Entity> {
        self.container
    }

    pub fn visible_path(&self) -> Option<Entity> {
        self.visible_path
    }

    pub fn hit_path(&self) -> Option<Entity> {
        self.hit_path
    }

    pub fn handles(&self) -> &[Entity] {
        &self.handles
    }

    /// Number of refreshes applied to live elements
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// Allocate the group, both paths and (if enabled) one handle per point.
    ///
    /// Any elements from an earlier lifecycle are removed first.
    pub fn create_visual<S: DrawingSurface>(&mut self, surface: &mut S, snapshot: VisualSnapshot) {
        self.destroy(surface);

        let container = surface.create_group(snapshot.transform);
        let path = generate_path(snapshot.points, snapshot.mode);
        self.visible_path =
            Some(surface.create_path(container, &path, &self.visible_attributes(snapshot.style)));
        self.hit_path =
            Some(surface.create_path(container, &path, &self.hit_attributes(snapshot.style)));
        self.container = Some(container);
        self.rebuild_handles(surface, container, snapshot);
    }

    /// Re-derive every element from the snapshot. Safe to call repeatedly.
    pub fn refresh<S: DrawingSurface>(&mut self, surface: &mut S, snapshot: VisualSnapshot) {
        let Some(container) = self.container else {
            return;
        };
        self.refresh_count += 1;

        surface.set_transform(container, snapshot.transform);

        let path = generate_path(snapshot.points, snapshot.mode);
        if let Some(visible) = self.visible_path {
            surface.set_path(visible, &path);
            surface.set_attributes(visible, &self.visible_attributes(snapshot.style));
        }
        if let Some(hit) = self.hit_path {
            surface.set_path(hit, &path);
            surface.set_attributes(hit, &self.hit_attributes(snapshot.style));
        }

        if !self.editable_handles {
            return;
        }
        if self.handles.len() != snapshot.points.len() {
            self.rebuild_handles(surface, container, snapshot);
            return;
        }
        let visibility = handle_visibility(snapshot.show_handles);
        for (&handle, &point) in self.handles.iter().zip(snapshot.points) {
            surface.set_handle_center(handle, point);
            surface.set_attributes(handle, &[("visibility", visibility.to_string())]);
        }
    }

    /// Remove every element owned by this marker.
    pub fn destroy<S: DrawingSurface>(&mut self, surface: &mut S) {
        for handle in self.handles.drain(..) {
            surface.remove(handle);
        }
        for element in [
            self.visible_path.take(),
            self.hit_path.take(),
            self.container.take(),
        ]
        .into_iter()
        .flatten()
        {
            surface.remove(element);
        }
    }

    /// True for the group, either path, or any handle
    pub fn owns(&self, entity: Entity) -> bool {
        self.container == Some(entity)
            || self.visible_path == Some(entity)
            || self.hit_path == Some(entity)
            || self.handles.contains(&entity)
    }

    pub fn handle_index(&self, entity: Entity) -> Option<usize> {
        self.handles.iter().position(|&h| h == entity)
    }

    fn rebuild_handles<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        container: Entity,
        snapshot: VisualSnapshot,
    ) {
        for handle in self.handles.drain(..) {
            surface.remove(handle);
        }
        if !self.editable_handles {
            return;
        }
        let attributes = handle_attributes(snapshot.show_handles);
        self.handles = snapshot
            .points
            .iter()
            .map(|&point| surface.create_handle(container, point, self.handle_radius, &attributes))
            .collect();
    }

    fn visible_attributes(&self, style: &Style) -> Attributes {
        let mut attributes = style.path_attributes();
        attributes.extend([
            ("fill", "none".to_string()),
            ("stroke-linecap", "round".to_string()),
            ("stroke-linejoin", "round".to_string()),
        ]);
        attributes
    }

    fn hit_attributes(&self, style: &Style) -> Attributes {
        vec![
            ("stroke", "transparent".to_string()),
            (
                "stroke-width",
                (style.stroke_width + self.hit_padding).to_string(),
            ),
            ("fill", "none".to_string()),
        ]
    }
}

fn handle_visibility(show: bool) -> &'static str {
    if show { "visible" } else { "hidden" }
}

fn handle_attributes(show: bool) -> Attributes {
    vec![
        ("fill", "white".to_string()),
        ("stroke", "#1e88e5".to_string()),
        ("stroke-width", "1".to_string()),
        ("visibility", handle_visibility(show).to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::surface::{ElementAttributes, HandleShape, MarkerGroup, PathShape};

    fn style() -> Style {
        Style {
            stroke_color: "red".to_string(),
            stroke_width: 3.0,
            stroke_dasharray: None,
        }
    }

    fn snapshot<'a>(points: &'a [Vec2], style: &'a Style) -> VisualSnapshot<'a> {
        VisualSnapshot {
            points,
            mode: PathMode::Smoothed,
            style,
            transform: Transform::IDENTITY,
            show_handles: true,
        }
    }

    fn element_count(world: &mut World) -> usize {
        world
            .query_filtered::<Entity, Or<(With<MarkerGroup>, With<PathShape>, With<HandleShape>)>>()
            .iter(world)
            .count()
    }

    fn path_data(world: &World, entity: Option<Entity>) -> String {
        world.get::<PathShape>(entity.unwrap()).unwrap().data.clone()
    }

    #[test]
    fn test_refresh_before_create_is_noop() {
        let mut world = World::new();
        let mut visual = VisualSynchronizer::new(&MarkerSettings::default());
        let style = style();
        visual.refresh(&mut world, snapshot(&[Vec2::ZERO, Vec2::ONE], &style));
        assert!(!visual.is_created());
        assert_eq!(visual.refresh_count(), 0);
        assert_eq!(element_count(&mut world), 0);
    }

    #[test]
    fn test_create_allocates_group_paths_and_handles() {
        let mut world = World::new();
        let mut visual = VisualSynchronizer::new(&MarkerSettings::default());
        let style = style();
        let points = [Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(10.0, 0.0)];
        visual.create_visual(&mut world, snapshot(&points, &style));

        assert!(visual.is_created());
        assert_eq!(visual.handles().len(), 3);
        for (i, &handle) in visual.handles().iter().enumerate() {
            assert_eq!(world.get::<HandleShape>(handle).unwrap().center, points[i]);
            assert_eq!(visual.handle_index(handle), Some(i));
        }
        let hit = world.get::<ElementAttributes>(visual.hit_path().unwrap()).unwrap();
        assert_eq!(hit.get("stroke"), Some("transparent"));
        assert!(hit.stroke_width() > style.stroke_width);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut world = World::new();
        let mut visual = VisualSynchronizer::new(&MarkerSettings::default());
        let style = style();
        let points = [Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(10.0, 0.0)];
        visual.create_visual(&mut world, snapshot(&points, &style));

        visual.refresh(&mut world, snapshot(&points, &style));
        let data = path_data(&world, visual.visible_path());
        let handles = visual.handles().to_vec();
        let attrs = world
            .get::<ElementAttributes>(visual.visible_path().unwrap())
            .cloned();

        visual.refresh(&mut world, snapshot(&points, &style));
        assert_eq!(path_data(&world, visual.visible_path()), data);
        assert_eq!(visual.handles(), handles.as_slice());
        assert_eq!(
            world
                .get::<ElementAttributes>(visual.visible_path().unwrap())
                .cloned(),
            attrs
        );
        assert_eq!(visual.refresh_count(), 2);
    }

    #[test]
    fn test_structural_change_rebuilds_handles() {
        let mut world = World::new();
        let mut visual = VisualSynchronizer::new(&MarkerSettings::default());
        let style = style();
        let mut points = vec![Vec2::ZERO, Vec2::ONE];
        visual.create_visual(&mut world, snapshot(&points, &style));
        let old_handles = visual.handles().to_vec();

        points.push(Vec2::new(2.0, 0.0));
        visual.refresh(&mut world, snapshot(&points, &style));

        assert_eq!(visual.handles().len(), 3);
        for old in old_handles {
            assert!(world.get_entity(old).is_err());
            assert!(!visual.owns(old));
        }
    }

    #[test]
    fn test_hidden_handles_when_not_shown() {
        let mut world = World::new();
        let mut visual = VisualSynchronizer::new(&MarkerSettings::default());
        let style = style();
        let points = [Vec2::ZERO, Vec2::ONE];
        visual.create_visual(&mut world, snapshot(&points, &style));
        visual.refresh(
            &mut world,
            VisualSnapshot {
                show_handles: false,
                ..snapshot(&points, &style)
            },
        );
        for &handle in visual.handles() {
            assert!(world.get::<ElementAttributes>(handle).unwrap().is_hidden());
        }
    }

    #[test]
    fn test_handles_disabled() {
        let mut world = World::new();
        let settings = MarkerSettings {
            editable_handles: false,
            ..Default::default()
        };
        let mut visual = VisualSynchronizer::new(&settings);
        let style = style();
        let points = [Vec2::ZERO, Vec2::ONE];
        visual.create_visual(&mut world, snapshot(&points, &style));
        visual.refresh(&mut world, snapshot(&points, &style));
        assert!(visual.handles().is_empty());
    }

    #[test]
    fn test_destroy_removes_everything() {
        let mut world = World::new();
        let mut visual = VisualSynchronizer::new(&MarkerSettings::default());
        let style = style();
        let points = [Vec2::ZERO, Vec2::ONE];
        visual.create_visual(&mut world, snapshot(&points, &style));
        let container = visual.container().unwrap();

        visual.destroy(&mut world);

        assert!(!visual.is_created());
        assert!(!visual.owns(container));
        assert!(world.get_entity(container).is_err());
        assert_eq!(element_count(&mut world), 0);
    }
}
