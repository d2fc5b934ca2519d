//! Drawing primitives: marker visuals as ECS entities with SVG-like attributes.
//!
//! Each rendered element is an entity. A marker gets one [`MarkerGroup`]
//! container, with [`PathShape`] and [`HandleShape`] children parented via
//! [`ChildOf`]. Presentation lives in [`ElementAttributes`] under SVG names
//! (`stroke`, `stroke-width`, `stroke-dasharray`, `fill`, `visibility`) so the
//! renderer and the picker read one format.

use std::collections::BTreeMap;

use bevy::prelude::*;
use kurbo::BezPath;

use super::path::path_data;

/// Attribute list as `(name, value)` pairs, applied in order.
pub type Attributes = Vec<(&'static str, String)>;

/// Container element grouping every visual of one marker
#[derive(Component, Debug, Default)]
pub struct MarkerGroup;

/// Path element holding SVG path data and the geometry it was built from
#[derive(Component, Debug, Clone, Default)]
pub struct PathShape {
    pub data: String,
    pub geometry: BezPath,
}

/// Circular handle element, center in the parent group's local space
#[derive(Component, Debug, Clone, Copy)]
pub struct HandleShape {
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ElementAttributes(pub BTreeMap<String, String>);

impl ElementAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: String) {
        self.0.insert(name.to_string(), value);
    }

    pub fn is_hidden(&self) -> bool {
        self.get("visibility") == Some("hidden")
    }

    /// Stroke width attribute, defaulting to 1 like SVG
    pub fn stroke_width(&self) -> f32 {
        self.get("stroke-width")
            .and_then(|w| w.parse().ok())
            .unwrap_or(1.0)
    }
}

impl From<&[(&'static str, String)]> for ElementAttributes {
    fn from(attributes: &[(&'static str, String)]) -> Self {
        let mut attrs = Self::default();
        for (name, value) in attributes {
            attrs.set(name, value.clone());
        }
        attrs
    }
}

/// Creates and mutates rendered elements on behalf of a marker.
///
/// Element identity is an [`Entity`], which is what the host hands back as
/// a pointer target.
pub trait DrawingSurface {
    fn create_group(&mut self, transform: Transform) -> Entity;

    fn create_path(
        &mut self,
        parent: Entity,
        path: &BezPath,
        attributes: &[(&'static str, String)],
    ) -> Entity;

    fn create_handle(
        &mut self,
        parent: Entity,
        center: Vec2,
        radius: f32,
        attributes: &[(&'static str, String)],
    ) -> Entity;

    fn set_path(&mut self, element: Entity, path: &BezPath);

    fn set_handle_center(&mut self, element: Entity, center: Vec2);

    /// Bulk attribute update; attributes not listed are left untouched.
    fn set_attributes(&mut self, element: Entity, attributes: &[(&'static str, String)]);

    fn set_transform(&mut self, element: Entity, transform: Transform);

    fn remove(&mut self, element: Entity);
}

impl DrawingSurface for World {
    fn create_group(&mut self, transform: Transform) -> Entity {
        self.spawn((MarkerGroup, transform)).id()
    }

    fn create_path(
        &mut self,
        parent: Entity,
        path: &BezPath,
        attributes: &[(&'static str, String)],
    ) -> Entity {
        self.spawn((
            PathShape {
                data: path_data(path),
                geometry: path.clone(),
            },
            ElementAttributes::from(attributes),
            Transform::IDENTITY,
            ChildOf(parent),
        ))
        .id()
    }

    fn create_handle(
        &mut self,
        parent: Entity,
        center: Vec2,
        radius: f32,
        attributes: &[(&'static str, String)],
    ) -> Entity {
        self.spawn((
            HandleShape { center, radius },
            ElementAttributes::from(attributes),
            Transform::IDENTITY,
            ChildOf(parent),
        ))
        .id()
    }

    fn set_path(&mut self, element: Entity, path: &BezPath) {
        if let Some(mut shape) = self.get_mut::<PathShape>(element) {
            shape.data = path_data(path);
            shape.geometry = path.clone();
        }
    }

    fn set_handle_center(&mut self, element: Entity, center: Vec2) {
        if let Some(mut handle) = self.get_mut::<HandleShape>(element) {
            handle.center = center;
        }
    }

    fn set_attributes(&mut self, element: Entity, attributes: &[(&'static str, String)]) {
        if let Some(mut attrs) = self.get_mut::<ElementAttributes>(element) {
            for (name, value) in attributes {
                // Skip no-op writes so change detection stays quiet on idle refreshes
                if attrs.get(name) != Some(value.as_str()) {
                    attrs.set(name, value.clone());
                }
            }
        }
    }

    fn set_transform(&mut self, element: Entity, transform: Transform) {
        if let Some(mut current) = self.get_mut::<Transform>(element)
            && *current != transform
        {
            *current = transform;
        }
    }

    fn remove(&mut self, element: Entity) {
        if self.get_entity(element).is_ok() {
            self.despawn(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::path::{generate_path, PathMode};

    #[test]
    fn test_create_path_sets_data_and_attributes() {
        let mut world = World::new();
        let group = world.create_group(Transform::IDENTITY);
        let path = generate_path(&[Vec2::ZERO, Vec2::new(3.0, 4.0)], PathMode::Polyline);
        let element = world.create_path(
            group,
            &path,
            &[("stroke", "red".to_string()), ("stroke-width", "2".to_string())],
        );

        let shape = world.get::<PathShape>(element).unwrap();
        assert_eq!(shape.data, path_data(&path));
        let attrs = world.get::<ElementAttributes>(element).unwrap();
        assert_eq!(attrs.get("stroke"), Some("red"));
        assert_eq!(attrs.stroke_width(), 2.0);
        assert_eq!(world.get::<ChildOf>(element).map(|c| c.parent()), Some(group));
    }

    #[test]
    fn test_set_attributes_merges() {
        let mut world = World::new();
        let group = world.create_group(Transform::IDENTITY);
        let handle = world.create_handle(group, Vec2::ONE, 4.0, &[("fill", "white".to_string())]);

        world.set_attributes(handle, &[("visibility", "hidden".to_string())]);

        let attrs = world.get::<ElementAttributes>(handle).unwrap();
        assert_eq!(attrs.get("fill"), Some("white"));
        assert!(attrs.is_hidden());
    }

    #[test]
    fn test_remove_missing_entity_is_noop() {
        let mut world = World::new();
        let group = world.create_group(Transform::IDENTITY);
        world.remove(group);
        world.remove(group);
        assert!(world.get_entity(group).is_err());
    }
}
