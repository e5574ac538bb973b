//! Identifier-keyed shape registry with stable paint order.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::shape::Shape;

/// Handle to a shape stored in a [`Scene`].
///
/// Ids are assigned from a monotonically increasing counter starting at 1
/// and are never reused, even after the shape is removed. 0 is never a
/// valid id, so a zeroed handle can always be recognized as unassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An edit was addressed to an id that is not in the registry.
///
/// Callers got their ids from a prior add, so hitting this usually means
/// the shape was removed in the meantime. It is safe to ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no shape with id {0} on this canvas")]
pub struct UnknownShapeId(pub ShapeId);

/// Registry of all live shapes, keyed by [`ShapeId`].
///
/// Paint order equals insertion order: the shape added first is composited
/// first (bottom layer). The id map and the order list always hold the same
/// id set; removal deletes from both.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    paint_order: Vec<ShapeId>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene. The first added shape gets id 1.
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
            paint_order: Vec::new(),
            next_id: 1,
        }
    }

    /// Adds a shape on top of all existing shapes and returns its id.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(id, shape);
        self.paint_order.push(id);
        id
    }

    /// Inserts a shape under an externally assigned id.
    ///
    /// Used when ids are handed out ahead of the insertion (the canvas
    /// returns ids without waiting for its worker). Keeps the internal
    /// counter ahead of every id seen so far. Re-inserting a live id
    /// replaces the shape in place without duplicating its paint slot.
    pub(crate) fn insert(&mut self, id: ShapeId, shape: Shape) {
        self.next_id = self.next_id.max(id.0 + 1);
        if self.shapes.insert(id, shape).is_none() {
            self.paint_order.push(id);
        }
    }

    /// Looks up a shape by id.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Looks up a shape by id for mutation.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Applies an in-place edit to the shape with the given id.
    pub fn edit<F>(&mut self, id: ShapeId, f: F) -> Result<(), UnknownShapeId>
    where
        F: FnOnce(&mut Shape),
    {
        match self.shapes.get_mut(&id) {
            Some(shape) => {
                f(shape);
                Ok(())
            }
            None => Err(UnknownShapeId(id)),
        }
    }

    /// Removes the shape with the given id. No-op if the id is absent.
    pub fn remove(&mut self, id: ShapeId) {
        if self.shapes.remove(&id).is_some() {
            self.paint_order.retain(|&other| other != id);
        }
    }

    /// Removes all shapes. The id counter keeps counting, so ids from
    /// before the clear are never handed out again.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.paint_order.clear();
    }

    /// Removes all shapes and rewinds the id counter, as if freshly created.
    pub fn reset(&mut self) {
        self.clear();
        self.next_id = 1;
    }

    /// Number of live shapes.
    pub fn len(&self) -> usize {
        self.paint_order.len()
    }

    /// True when no shapes are registered.
    pub fn is_empty(&self) -> bool {
        self.paint_order.is_empty()
    }

    /// Iterates shapes in paint order (bottom layer first).
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.paint_order
            .iter()
            .filter_map(|&id| self.shapes.get(&id).map(|shape| (id, shape)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Color;

    #[test]
    fn first_id_is_one() {
        let mut scene = Scene::new();
        let id = scene.add(Shape::rect(0, 0, 10, 10));
        assert_eq!(id.raw(), 1);
    }

    #[test]
    fn ids_strictly_increase_across_removals_and_clears() {
        let mut scene = Scene::new();
        let mut seen = Vec::new();

        seen.push(scene.add(Shape::rect(0, 0, 1, 1)));
        seen.push(scene.add(Shape::oval(0, 0, 1, 1)));
        scene.remove(seen[0]);
        seen.push(scene.add(Shape::line(0, 0, 1, 1)));
        scene.clear();
        seen.push(scene.add(Shape::text("x", 0, 0)));

        for pair in seen.windows(2) {
            assert!(pair[0] < pair[1], "ids must strictly increase");
        }
        assert_eq!(seen.last().copied().map(ShapeId::raw), Some(4));
    }

    #[test]
    fn remove_then_get_is_absent() {
        let mut scene = Scene::new();
        let id = scene.add(Shape::rect(0, 0, 10, 10));
        scene.remove(id);
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut scene = Scene::new();
        let id = scene.add(Shape::rect(0, 0, 10, 10));
        scene.remove(ShapeId::from_raw(999));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());
    }

    #[test]
    fn paint_order_is_insertion_order_minus_removals() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::rect(0, 0, 1, 1));
        let b = scene.add(Shape::oval(0, 0, 1, 1));
        let c = scene.add(Shape::line(0, 0, 1, 1));

        scene.remove(b);
        let order: Vec<ShapeId> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, c]);
    }

    #[test]
    fn attribute_edits_do_not_reorder() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::rect(0, 0, 1, 1));
        let b = scene.add(Shape::oval(0, 0, 1, 1));

        scene
            .edit(a, |s| s.set_fill(Color::new(1.0, 0.0, 0.0, 1.0)))
            .unwrap();
        scene.edit(a, |s| s.move_to(50, 50)).unwrap();

        let order: Vec<ShapeId> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn clear_keeps_counter() {
        let mut scene = Scene::new();
        scene.add(Shape::rect(0, 0, 1, 1));
        scene.add(Shape::rect(0, 0, 1, 1));
        scene.clear();
        assert!(scene.is_empty());
        let id = scene.add(Shape::rect(0, 0, 1, 1));
        assert_eq!(id.raw(), 3);
    }

    #[test]
    fn reset_rewinds_counter() {
        let mut scene = Scene::new();
        scene.add(Shape::rect(0, 0, 1, 1));
        scene.add(Shape::rect(0, 0, 1, 1));
        scene.reset();
        let id = scene.add(Shape::rect(0, 0, 1, 1));
        assert_eq!(id.raw(), 1);
    }

    #[test]
    fn edit_unknown_id_names_the_id() {
        let mut scene = Scene::new();
        let err = scene
            .edit(ShapeId::from_raw(7), |s| s.move_to(0, 0))
            .unwrap_err();
        assert_eq!(err, UnknownShapeId(ShapeId::from_raw(7)));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn insert_keeps_counter_ahead() {
        let mut scene = Scene::new();
        scene.insert(ShapeId::from_raw(10), Shape::rect(0, 0, 1, 1));
        let id = scene.add(Shape::rect(0, 0, 1, 1));
        assert_eq!(id.raw(), 11);
    }
}
