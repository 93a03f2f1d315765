//! The drawing surface that markers are attached to.
//!
//! A [`Scene`] owns the mapping from a view's dataset plane to its drawing
//! space and holds the visuals currently on display. Which dataset axes make
//! up that plane is decided once, by [`ViewAxes`], before anything reaches
//! the scene.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::extent::{Axis, DepthRange, ObjectExtent, Rect};
use crate::visual::{PayloadKind, Visual};

/// Vertical presentation of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flip {
    #[default]
    Normal,
    Flipped,
}

impl Flip {
    /// Returns `+1.0` for [`Flip::Normal`] and `-1.0` for [`Flip::Flipped`].
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Flip::Normal => 1.0,
            Flip::Flipped => -1.0,
        }
    }
}

/// Current axis presentation of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub rotation_degrees: f32,
    pub vertical_flip: Flip,
}

/// Assignment of dataset axes to a 2D view.
///
/// This is the only place where dataset coordinates are reordered; scenes
/// receive in-plane coordinates as `(horizontal, vertical)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAxes {
    pub horizontal: Axis,
    pub vertical: Axis,
    pub depth: Axis,
}

impl ViewAxes {
    /// Canonical axes for a view looking along `depth`.
    ///
    /// `X` gives a `(Y, Z)` plane, `Y` gives `(X, Z)`, `Z` gives `(X, Y)`.
    #[must_use]
    pub fn orthogonal_to(depth: Axis) -> Self {
        let (horizontal, vertical) = match depth {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        };
        Self {
            horizontal,
            vertical,
            depth,
        }
    }

    /// Returns the same view with the in-plane axes swapped.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            horizontal: self.vertical,
            vertical: self.horizontal,
            depth: self.depth,
        }
    }

    /// Drops the depth component of a dataset-space point.
    #[must_use]
    pub fn to_plane(&self, point: Vec3) -> Vec2 {
        Vec2::new(
            self.horizontal.component(point),
            self.vertical.component(point),
        )
    }

    /// In-plane footprint of an object, in dataset space.
    #[must_use]
    pub fn plane_rect(&self, extent: &ObjectExtent) -> Rect {
        Rect::from_corners(self.to_plane(extent.min()), self.to_plane(extent.max()))
    }

    /// Extent of an object along this view's depth axis.
    #[must_use]
    pub fn depth_range(&self, extent: &ObjectExtent) -> DepthRange {
        let along = extent.axis(self.depth);
        DepthRange::new(along.min, along.max)
    }
}

impl Default for ViewAxes {
    fn default() -> Self {
        Self::orthogonal_to(Axis::Z)
    }
}

/// Handle of a visual attached to a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisualId(pub u64);

/// A 2D drawing surface.
pub trait Scene {
    /// Maps dataset-plane coordinates to drawing space.
    fn project(&self, point: Vec2) -> Vec2;

    /// Returns the current axis presentation.
    fn orientation(&self) -> Orientation;

    /// Adds a visual under `id`.
    fn attach(&mut self, id: VisualId, visual: &Visual);

    /// Replaces the geometry of an attached visual.
    fn update(&mut self, id: VisualId, visual: &Visual);

    /// Removes a visual. Does nothing if `id` is not attached.
    fn detach(&mut self, id: VisualId);
}

/// A call received by a [`HeadlessScene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    Attach(VisualId, PayloadKind),
    Update(VisualId, PayloadKind),
    Detach(VisualId),
}

/// An in-memory [`Scene`] with an affine projection.
///
/// Keeps the attached visuals and a log of every call that changed them.
#[derive(Debug)]
pub struct HeadlessScene {
    scale: f32,
    offset: Vec2,
    orientation: Orientation,
    attached: BTreeMap<VisualId, Visual>,
    events: Vec<SceneEvent>,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            orientation: Orientation::default(),
            attached: BTreeMap::new(),
            events: Vec::new(),
        }
    }
}

impl HeadlessScene {
    /// Creates a scene with the identity projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zoom factor applied after rotation and flip.
    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Sets the drawing-space translation.
    pub fn set_offset(&mut self, offset: Vec2) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Sets the axis presentation.
    pub fn set_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    /// Returns the visual attached under `id`.
    #[must_use]
    pub fn get(&self, id: VisualId) -> Option<&Visual> {
        self.attached.get(&id)
    }

    /// Returns whether `id` is attached.
    #[must_use]
    pub fn is_attached(&self, id: VisualId) -> bool {
        self.attached.contains_key(&id)
    }

    /// Returns the ids of all attached visuals in ascending order.
    pub fn attached_ids(&self) -> impl Iterator<Item = VisualId> + '_ {
        self.attached.keys().copied()
    }

    /// Returns the number of attached visuals.
    #[must_use]
    pub fn num_attached(&self) -> usize {
        self.attached.len()
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Clears the recorded calls.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Scene for HeadlessScene {
    fn project(&self, point: Vec2) -> Vec2 {
        let rotation = Vec2::from_angle(self.orientation.rotation_degrees.to_radians());
        let rotated = rotation.rotate(point);
        let flipped = Vec2::new(
            rotated.x,
            rotated.y * self.orientation.vertical_flip.sign(),
        );
        self.offset + flipped * self.scale
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn attach(&mut self, id: VisualId, visual: &Visual) {
        self.events.push(SceneEvent::Attach(id, visual.kind()));
        self.attached.insert(id, visual.clone());
    }

    fn update(&mut self, id: VisualId, visual: &Visual) {
        if let Some(slot) = self.attached.get_mut(&id) {
            self.events.push(SceneEvent::Update(id, visual.kind()));
            *slot = visual.clone();
        }
    }

    fn detach(&mut self, id: VisualId) {
        if self.attached.remove(&id).is_some() {
            self.events.push(SceneEvent::Detach(id));
        }
    }
}
