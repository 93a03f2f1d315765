//! Three orthogonal slice views sharing one set of detections.

use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec3;
use hilite_core::{
    Axis, MarkerOptions, MarkerRegistry, ObjectExtent, Scene, SliceMask, Timestep, ViewAxes,
};

/// One [`MarkerRegistry`] per depth axis, driven by a shared 3D cursor.
///
/// View `i` looks along `Axis::ALL[i]`, so the slice position of each view
/// is the matching component of the cursor.
pub struct OrthoViews<K, S> {
    views: [MarkerRegistry<K, S>; 3],
    cursor: Vec3,
}

impl<K, S> OrthoViews<K, S>
where
    K: Eq + Hash + Debug + Clone,
    S: Scene,
{
    /// Creates the three views, in `X, Y, Z` depth-axis order.
    pub fn new(scenes: [S; 3], options: &MarkerOptions) -> Self {
        let [x, y, z] = scenes;
        let view = |scene, depth| {
            MarkerRegistry::new(scene, ViewAxes::orthogonal_to(depth), options.clone())
        };
        Self {
            views: [view(x, Axis::X), view(y, Axis::Y), view(z, Axis::Z)],
            cursor: Vec3::ZERO,
        }
    }

    /// Closes every view and returns the scenes.
    pub fn close(self) -> [S; 3] {
        self.views.map(MarkerRegistry::close)
    }

    /// Adds a bounding-box marker to every view.
    ///
    /// `masks[i]` is the object's footprint in the view looking along
    /// `Axis::ALL[i]`. `cursor` is where the detection was made.
    pub fn add(
        &mut self,
        time: Timestep,
        id: &K,
        extent: ObjectExtent,
        masks: [Option<SliceMask>; 3],
        cursor: Vec3,
    ) {
        for ((view, axis), mask) in self.views.iter_mut().zip(Axis::ALL).zip(masks) {
            view.add(time, id.clone(), extent, mask, axis.component(cursor));
        }
    }

    /// Adds a cross marker to every view.
    pub fn add_point(&mut self, time: Timestep, id: &K, extent: ObjectExtent, cursor: Vec3) {
        for (view, axis) in self.views.iter_mut().zip(Axis::ALL) {
            view.add_point(time, id.clone(), extent, axis.component(cursor));
        }
    }

    /// Removes the markers of `id` at `time` from every view.
    pub fn remove(&mut self, time: Timestep, id: &K) {
        for view in &mut self.views {
            view.remove(time, id);
        }
    }

    /// Moves the slice of the view looking along `axis`.
    ///
    /// The other two views are not touched.
    pub fn change_slice(&mut self, axis: Axis, position: f32) {
        if !position.is_finite() {
            log::warn!("ignoring non-finite {axis:?} slice {position}");
            return;
        }
        self.cursor[axis.index()] = position;
        self.views[axis.index()].change_slice_position(position);
    }

    /// Moves all three slices to the planes through `cursor`.
    pub fn set_cursor(&mut self, cursor: Vec3) {
        for axis in Axis::ALL {
            self.change_slice(axis, axis.component(cursor));
        }
    }

    /// Switches every view to `time`.
    pub fn change_timestep(&mut self, time: Timestep) {
        for view in &mut self.views {
            view.change_timestep(time);
        }
    }

    /// Re-applies geometry in every view.
    pub fn refresh_visuals(&mut self) {
        for view in &mut self.views {
            view.refresh_visuals();
        }
    }

    /// Detaches and discards all markers in every view.
    pub fn clear(&mut self) {
        for view in &mut self.views {
            view.clear();
        }
    }

    /// Replaces the appearance options of every view.
    pub fn set_options(&mut self, options: &MarkerOptions) {
        for view in &mut self.views {
            view.set_options(options.clone());
        }
    }

    /// Returns the last cursor position.
    pub fn cursor(&self) -> Vec3 {
        self.cursor
    }

    /// Returns the view looking along `axis`.
    pub fn view(&self, axis: Axis) -> &MarkerRegistry<K, S> {
        &self.views[axis.index()]
    }

    /// Returns the view looking along `axis`, mutably.
    pub fn view_mut(&mut self, axis: Axis) -> &mut MarkerRegistry<K, S> {
        &mut self.views[axis.index()]
    }
}
