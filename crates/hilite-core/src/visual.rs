//! Drawable primitives handed to a [`Scene`](crate::scene::Scene).

use std::sync::Arc;

use glam::Vec2;
use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::extent::Rect;
use crate::scene::Orientation;
use crate::state::DepthState;

/// Pen used to draw a visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Line width in drawing-space pixels.
    pub width: f32,
    /// RGBA color.
    pub color: [u8; 4],
}

impl Stroke {
    pub const fn new(width: f32, color: [u8; 4]) -> Self {
        Self { width, color }
    }
}

/// A line segment in drawing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    #[must_use]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

/// What a visual draws.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Axis-aligned bounding rectangle.
    Rect { rect: Rect },
    /// Horizontal and vertical line through a point.
    Cross { center: Vec2, half_size: f32 },
    /// Cross with both diagonals of its bounding square drawn through it.
    CrossedOut {
        center: Vec2,
        half_size: f32,
        diagonals: [Segment; 2],
    },
    /// Outline silhouette image stretched over `placement`.
    Outline {
        image: Arc<GrayImage>,
        placement: Rect,
        orientation: Orientation,
    },
    /// Filled silhouette image with both diagonals of `placement` drawn on top.
    Filled {
        image: Arc<GrayImage>,
        placement: Rect,
        orientation: Orientation,
        diagonals: [Segment; 2],
    },
}

/// Discriminant of a [`Payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Rect,
    Cross,
    CrossedOut,
    Outline,
    Filled,
}

impl Payload {
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Rect { .. } => PayloadKind::Rect,
            Payload::Cross { .. } => PayloadKind::Cross,
            Payload::CrossedOut { .. } => PayloadKind::CrossedOut,
            Payload::Outline { .. } => PayloadKind::Outline,
            Payload::Filled { .. } => PayloadKind::Filled,
        }
    }

    /// Returns the silhouette image, if this payload shows one.
    #[must_use]
    pub fn image(&self) -> Option<&Arc<GrayImage>> {
        match self {
            Payload::Outline { image, .. } | Payload::Filled { image, .. } => Some(image),
            Payload::Rect { .. } | Payload::Cross { .. } | Payload::CrossedOut { .. } => None,
        }
    }
}

/// Returns the two lines of a cross centered at `center`.
#[must_use]
pub fn cross_lines(center: Vec2, half_size: f32) -> [Segment; 2] {
    [
        Segment::new(
            center - Vec2::new(half_size, 0.0),
            center + Vec2::new(half_size, 0.0),
        ),
        Segment::new(
            center - Vec2::new(0.0, half_size),
            center + Vec2::new(0.0, half_size),
        ),
    ]
}

/// Returns the square enclosing a cross centered at `center`.
#[must_use]
pub fn cross_bounds(center: Vec2, half_size: f32) -> Rect {
    Rect::from_corners(center - Vec2::splat(half_size), center + Vec2::splat(half_size))
}

/// Returns both diagonals of `rect`.
#[must_use]
pub fn diagonals(rect: &Rect) -> [Segment; 2] {
    let [a, b, c, d] = rect.corners();
    [Segment::new(a, c), Segment::new(b, d)]
}

/// A styled payload, as attached to a scene.
#[derive(Debug, Clone)]
pub struct Visual {
    /// Depth state this visual was rendered for.
    pub state: DepthState,
    pub stroke: Stroke,
    pub payload: Payload,
}

impl Visual {
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        self.payload.kind()
    }
}
