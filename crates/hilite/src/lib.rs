//! hilite-rs: slice-view hilite markers for volumetric microscopy data.
//!
//! Markers show where labelled 3D objects sit relative to the slice being
//! displayed. On the slice that intersects an object, its marker is a
//! bounding rectangle (or a cross for point detections). Off that range, it
//! becomes a silhouette preview: an outline before the object begins, a
//! filled footprint crossed through once the slice has passed it.
//!
//! # Quick Start
//!
//! ```
//! use hilite_rs::*;
//!
//! fn main() -> Result<()> {
//!     let mut registry: MarkerRegistry<&str, HeadlessScene> = MarkerRegistry::new(
//!         HeadlessScene::new(),
//!         ViewAxes::orthogonal_to(Axis::Z),
//!         MarkerOptions::default(),
//!     );
//!
//!     let extent = ObjectExtent::from_bounds(Vec3::splat(2.0), Vec3::splat(8.0))?;
//!     registry.add(0, "cell1", extent, None, 5.0);
//!     assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
//!
//!     registry.change_slice_position(1.0);
//!     assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::BelowRange));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`MarkerRegistry`] - all markers of one 2D view, keyed by timestep and object id
//! - [`Scene`] - the drawing surface a registry attaches [`Visual`]s to
//! - [`ViewAxes`] - which dataset axes a view shows, and which one is depth
//! - [`OrthoViews`] - three registries driven by one 3D cursor

mod views;

pub use hilite_core::{
    error::{HiliteError, Result},
    extent::{Axis, AxisExtent, DepthRange, ObjectExtent, Rect},
    marker::{render, reposition, Marker, MarkerShape},
    mask::{Silhouettes, SliceMask},
    options::MarkerOptions,
    registry::{MarkerRegistry, Timestep},
    scene::{Flip, HeadlessScene, Orientation, Scene, SceneEvent, ViewAxes, VisualId},
    state::DepthState,
    visual::{Payload, PayloadKind, Segment, Stroke, Visual},
    Vec2, Vec3,
};

pub use views::OrthoViews;

/// Initializes logging from `RUST_LOG`.
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
