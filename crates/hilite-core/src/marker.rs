//! A single hilite marker and its rendering.

use glam::Vec2;

use crate::extent::{DepthRange, ObjectExtent, Rect};
use crate::mask::{Silhouettes, SliceMask};
use crate::options::MarkerOptions;
use crate::scene::{Scene, ViewAxes, VisualId};
use crate::state::DepthState;
use crate::visual::{cross_bounds, diagonals, Payload, Visual};

/// Edge of the footprint synthesized for boxes without a mask, in pixels.
///
/// Scenes stretch silhouettes over the placement, so the object's size
/// does not need to be reflected here.
pub const SOLID_FOOTPRINT_EDGE: u32 = 16;

/// How a marker presents its object on the slice it intersects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    /// Bounding box; previews off-slice objects with silhouettes.
    Box,
    /// Cross at the object center.
    Point,
}

/// Marker state for one object in one view.
///
/// All coordinates are kept in dataset space. Drawing-space geometry is
/// recomputed through [`Scene::project`] every time a visual is built or
/// repositioned.
#[derive(Debug, Clone)]
pub struct Marker {
    shape: MarkerShape,
    extent: ObjectExtent,
    plane_rect: Rect,
    plane_center: Vec2,
    depth_range: DepthRange,
    silhouettes: Option<Silhouettes>,
    state: DepthState,
    visual_id: VisualId,
    visual: Option<Visual>,
    attached: bool,
}

impl Marker {
    /// Creates a detached marker classified against `position`.
    ///
    /// Box markers derive their silhouettes here, from `mask` or from a
    /// solid footprint when no mask is given. Point markers ignore `mask`.
    pub fn new(
        shape: MarkerShape,
        extent: ObjectExtent,
        axes: &ViewAxes,
        mask: Option<SliceMask>,
        position: f32,
        visual_id: VisualId,
    ) -> Self {
        let plane_rect = axes.plane_rect(&extent);
        let depth_range = axes.depth_range(&extent);
        let silhouettes = match shape {
            MarkerShape::Box => {
                let mask = mask.unwrap_or_else(|| {
                    SliceMask::solid(SOLID_FOOTPRINT_EDGE, SOLID_FOOTPRINT_EDGE)
                });
                Some(mask.silhouettes())
            }
            MarkerShape::Point => None,
        };

        Self {
            shape,
            extent,
            plane_rect,
            plane_center: axes.to_plane(extent.center()),
            depth_range,
            silhouettes,
            state: depth_range.classify(position),
            visual_id,
            visual: None,
            attached: false,
        }
    }

    #[must_use]
    pub fn shape(&self) -> MarkerShape {
        self.shape
    }

    #[must_use]
    pub fn extent(&self) -> &ObjectExtent {
        &self.extent
    }

    #[must_use]
    pub fn depth_range(&self) -> DepthRange {
        self.depth_range
    }

    #[must_use]
    pub fn plane_rect(&self) -> Rect {
        self.plane_rect
    }

    #[must_use]
    pub fn state(&self) -> DepthState {
        self.state
    }

    #[must_use]
    pub fn visual_id(&self) -> VisualId {
        self.visual_id
    }

    /// Returns the visual last rendered for this marker.
    #[must_use]
    pub fn visual(&self) -> Option<&Visual> {
        self.visual.as_ref()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn silhouettes(&self) -> Option<&Silhouettes> {
        self.silhouettes.as_ref()
    }

    /// Re-derives the in-plane footprint and depth range for new view axes.
    pub(crate) fn rebind(&mut self, axes: &ViewAxes) {
        self.plane_rect = axes.plane_rect(&self.extent);
        self.plane_center = axes.to_plane(self.extent.center());
        self.depth_range = axes.depth_range(&self.extent);
    }

    /// Reclassifies against `position`. Returns true if the state changed.
    pub(crate) fn reclassify(&mut self, position: f32) -> bool {
        let state = self.depth_range.classify(position);
        let changed = state != self.state;
        self.state = state;
        changed
    }

    /// Brings the visual in line with the current state.
    ///
    /// A state change (or a missing visual) swaps in a freshly rendered
    /// payload, re-attached if it was on display; otherwise only the
    /// geometry is refreshed.
    pub(crate) fn sync<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        options: &MarkerOptions,
        force_render: bool,
    ) {
        let stale = force_render
            || self
                .visual
                .as_ref()
                .map_or(true, |visual| visual.state != self.state);

        if stale {
            let fresh = render(self, &*scene, options);
            if self.attached {
                scene.detach(self.visual_id);
                scene.attach(self.visual_id, &fresh);
            }
            self.visual = Some(fresh);
        } else if let Some(mut current) = self.visual.take() {
            reposition(self, &mut current, &*scene, options);
            if self.attached {
                scene.update(self.visual_id, &current);
            }
            self.visual = Some(current);
        }
    }

    /// Attaches the current visual, rendering it first if needed.
    pub(crate) fn show<S: Scene + ?Sized>(&mut self, scene: &mut S, options: &MarkerOptions) {
        if self.attached {
            return;
        }
        self.sync(scene, options, false);
        if let Some(visual) = &self.visual {
            scene.attach(self.visual_id, visual);
            self.attached = true;
        }
    }

    /// Drops the cached visual of a detached marker so the next
    /// [`show`](Self::show) renders it from scratch.
    pub(crate) fn invalidate(&mut self) {
        if !self.attached {
            self.visual = None;
        }
    }

    /// Detaches the visual if attached.
    pub(crate) fn hide<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        if self.attached {
            scene.detach(self.visual_id);
            self.attached = false;
        }
    }
}

/// Bounding rectangle of `rect` after projection.
fn project_rect<S: Scene + ?Sized>(scene: &S, rect: &Rect) -> Rect {
    let corners = rect.corners().map(|c| scene.project(c));
    let first = corners[0];
    let (min, max) = corners
        .iter()
        .fold((first, first), |(min, max), c| (min.min(*c), max.max(*c)));
    Rect { min, max }
}

/// Builds the visual for a marker's current state.
pub fn render<S: Scene + ?Sized>(marker: &Marker, scene: &S, options: &MarkerOptions) -> Visual {
    let state = marker.state;
    let stroke = if state.is_active() {
        options.active
    } else {
        options.inactive
    };

    let payload = match (marker.shape, state, &marker.silhouettes) {
        (MarkerShape::Point, DepthState::AboveRange, _) => {
            let center = scene.project(marker.plane_center);
            Payload::CrossedOut {
                center,
                half_size: options.cross_half_size,
                diagonals: diagonals(&cross_bounds(center, options.cross_half_size)),
            }
        }
        (MarkerShape::Point, _, _) => Payload::Cross {
            center: scene.project(marker.plane_center),
            half_size: options.cross_half_size,
        },
        (MarkerShape::Box, DepthState::Active, _) | (MarkerShape::Box, _, None) => Payload::Rect {
            rect: project_rect(scene, &marker.plane_rect.expanded(options.margin)),
        },
        (MarkerShape::Box, DepthState::BelowRange, Some(silhouettes)) => Payload::Outline {
            image: silhouettes.outline.clone(),
            placement: project_rect(scene, &marker.plane_rect),
            orientation: scene.orientation(),
        },
        (MarkerShape::Box, DepthState::AboveRange, Some(silhouettes)) => {
            let placement = project_rect(scene, &marker.plane_rect);
            Payload::Filled {
                image: silhouettes.filled.clone(),
                placement,
                orientation: scene.orientation(),
                diagonals: diagonals(&placement),
            }
        }
    };

    Visual {
        state,
        stroke,
        payload,
    }
}

/// Refreshes the geometry of `visual` in place, keeping its payload kind
/// and silhouette image.
pub fn reposition<S: Scene + ?Sized>(
    marker: &Marker,
    visual: &mut Visual,
    scene: &S,
    options: &MarkerOptions,
) {
    match &mut visual.payload {
        Payload::Rect { rect } => {
            *rect = project_rect(scene, &marker.plane_rect.expanded(options.margin));
        }
        Payload::Cross { center, half_size } => {
            *center = scene.project(marker.plane_center);
            *half_size = options.cross_half_size;
        }
        Payload::CrossedOut {
            center,
            half_size,
            diagonals: lines,
        } => {
            *center = scene.project(marker.plane_center);
            *half_size = options.cross_half_size;
            *lines = diagonals(&cross_bounds(*center, *half_size));
        }
        Payload::Outline {
            placement,
            orientation,
            ..
        } => {
            *placement = project_rect(scene, &marker.plane_rect);
            *orientation = scene.orientation();
        }
        Payload::Filled {
            placement,
            orientation,
            diagonals: lines,
            ..
        } => {
            *placement = project_rect(scene, &marker.plane_rect);
            *orientation = scene.orientation();
            *lines = diagonals(placement);
        }
    }
}
