//! Core abstractions for hilite-rs.
//!
//! This crate provides the building blocks of slice-view hilite markers:
//! - [`ObjectExtent`] and [`DepthRange`] for an object's bounding volume
//! - [`SliceMask`] footprints and the silhouettes derived from them
//! - the [`Scene`] trait for the drawing surface markers are attached to
//! - [`MarkerRegistry`], which keeps markers in step with the displayed
//!   timestep and slice position

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extent;
pub mod marker;
pub mod mask;
pub mod options;
pub mod registry;
pub mod scene;
pub mod state;
pub mod visual;

pub use error::{HiliteError, Result};
pub use extent::{Axis, AxisExtent, DepthRange, ObjectExtent, Rect};
pub use marker::{Marker, MarkerShape};
pub use mask::{Silhouettes, SliceMask};
pub use options::MarkerOptions;
pub use registry::{MarkerRegistry, Timestep};
pub use scene::{Flip, HeadlessScene, Orientation, Scene, SceneEvent, ViewAxes, VisualId};
pub use state::DepthState;
pub use visual::{Payload, PayloadKind, Segment, Stroke, Visual};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
