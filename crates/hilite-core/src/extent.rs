//! Object extents in dataset (volume) space.
//!
//! A detected object is described by its bounding volume: one
//! [`AxisExtent`] per spatial axis. Views reduce that volume to an in-plane
//! [`Rect`] and a [`DepthRange`] along the axis orthogonal to the view.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{HiliteError, Result};
use crate::state::DepthState;

/// A spatial axis of the volumetric dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the component index of this axis (`X = 0`, `Y = 1`, `Z = 2`).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Returns the component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: Vec3) -> f32 {
        v[self.index()]
    }
}

/// Extent of an object along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    pub min: f32,
    pub center: f32,
    pub max: f32,
}

impl AxisExtent {
    /// Creates a validated extent.
    ///
    /// Fails with [`HiliteError::InvalidExtent`] unless all values are finite
    /// and `min <= center <= max`.
    pub fn new(axis: Axis, min: f32, center: f32, max: f32) -> Result<Self> {
        let finite = min.is_finite() && center.is_finite() && max.is_finite();
        if !finite || min > center || center > max {
            return Err(HiliteError::InvalidExtent {
                axis,
                min,
                center,
                max,
            });
        }
        Ok(Self { min, center, max })
    }

    /// Creates an extent without validation.
    ///
    /// The caller guarantees `min <= max`. Markers built from an extent that
    /// breaks this have unspecified appearance.
    #[must_use]
    pub fn new_unchecked(min: f32, center: f32, max: f32) -> Self {
        Self { min, center, max }
    }

    /// Returns `max - min`.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.max - self.min
    }
}

/// Bounding volume of an object, one extent per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectExtent {
    axes: [AxisExtent; 3],
}

impl ObjectExtent {
    /// Creates an object extent from per-axis extents in `X, Y, Z` order.
    #[must_use]
    pub fn new(x: AxisExtent, y: AxisExtent, z: AxisExtent) -> Self {
        Self { axes: [x, y, z] }
    }

    /// Creates an object extent from its corners, centered at the midpoint.
    pub fn from_bounds(min: Vec3, max: Vec3) -> Result<Self> {
        let center = (min + max) * 0.5;
        let mut axes = [AxisExtent::new_unchecked(0.0, 0.0, 0.0); 3];
        for axis in Axis::ALL {
            let i = axis.index();
            axes[i] = AxisExtent::new(axis, min[i], center[i], max[i])?;
        }
        Ok(Self { axes })
    }

    /// Returns the extent along `axis`.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> AxisExtent {
        self.axes[axis.index()]
    }

    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.axes[0].min, self.axes[1].min, self.axes[2].min)
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.axes[0].max, self.axes[1].max, self.axes[2].max)
    }

    /// Returns the per-axis centers.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.axes[0].center, self.axes[1].center, self.axes[2].center)
    }
}

/// Range of slice positions along a view's depth axis for which an object
/// is on-slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub low: f32,
    pub high: f32,
}

impl DepthRange {
    /// Creates a depth range. `low <= high` is a precondition.
    #[must_use]
    pub fn new(low: f32, high: f32) -> Self {
        debug_assert!(low <= high, "depth range low {low} > high {high}");
        Self { low, high }
    }

    /// Classifies a slice position against this range.
    #[must_use]
    pub fn classify(&self, position: f32) -> DepthState {
        if position < self.low {
            DepthState::BelowRange
        } else if position > self.high {
            DepthState::AboveRange
        } else {
            DepthState::Active
        }
    }

    /// Returns whether `position` lies within the range (inclusive).
    #[must_use]
    pub fn contains(&self, position: f32) -> bool {
        self.classify(position).is_active()
    }
}

/// An axis-aligned rectangle, either in a view's dataset plane or in
/// drawing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Creates a rectangle from any two opposite corners.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns the rectangle grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the four corners, counter-clockwise from `min`.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}
