//! Marker registry for one slice view.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::extent::ObjectExtent;
use crate::marker::{Marker, MarkerShape};
use crate::mask::SliceMask;
use crate::options::MarkerOptions;
use crate::scene::{Scene, ViewAxes, VisualId};
use crate::state::DepthState;
use crate::visual::Visual;

/// Discrete time index of a time-series dataset.
pub type Timestep = u32;

/// Registry for all hilite markers shown in one slice view.
///
/// Markers are organized by timestep and then by object id. Only markers of
/// the current timestep are attached to the scene; the others keep their
/// state and are reclassified when their timestep becomes current.
///
/// Every operation is total: adding an existing key, removing a missing one,
/// or moving the slice of an empty timestep does nothing.
pub struct MarkerRegistry<K, S> {
    scene: S,
    axes: ViewAxes,
    options: MarkerOptions,
    /// Map from timestep -> (object id -> marker)
    buckets: HashMap<Timestep, HashMap<K, Marker>>,
    current_timestep: Timestep,
    slice_position: Option<f32>,
    next_visual_id: u64,
}

impl<K, S> MarkerRegistry<K, S>
where
    K: Eq + Hash + Debug,
    S: Scene,
{
    /// Creates an empty registry drawing into `scene`.
    ///
    /// The current timestep starts at `0` and no slice position is known.
    pub fn new(scene: S, axes: ViewAxes, options: MarkerOptions) -> Self {
        log::info!("opening marker registry for depth axis {:?}", axes.depth);
        Self {
            scene,
            axes,
            options,
            buckets: HashMap::new(),
            current_timestep: 0,
            slice_position: None,
            next_visual_id: 0,
        }
    }

    /// Detaches every marker and hands the scene back.
    pub fn close(mut self) -> S {
        self.clear();
        log::info!("closed marker registry for depth axis {:?}", self.axes.depth);
        self.scene
    }

    /// Adds a bounding-box marker for `id` at `time`.
    ///
    /// `mask` is the object's footprint at its central slice; silhouettes
    /// are derived from it before this returns. `position` is the slice
    /// position the detection was made at. Does nothing if the key exists.
    pub fn add(
        &mut self,
        time: Timestep,
        id: K,
        extent: ObjectExtent,
        mask: Option<SliceMask>,
        position: f32,
    ) {
        self.insert(MarkerShape::Box, time, id, extent, mask, position);
    }

    /// Adds a cross marker at the center of `extent`.
    pub fn add_point(&mut self, time: Timestep, id: K, extent: ObjectExtent, position: f32) {
        self.insert(MarkerShape::Point, time, id, extent, None, position);
    }

    fn insert(
        &mut self,
        shape: MarkerShape,
        time: Timestep,
        id: K,
        extent: ObjectExtent,
        mask: Option<SliceMask>,
        position: f32,
    ) {
        let position = if position.is_finite() {
            position
        } else {
            log::warn!("non-finite slice position {position} for {id:?}, using last known");
            self.slice_position
                .unwrap_or_else(|| extent.axis(self.axes.depth).center)
        };

        let bucket = self.buckets.entry(time).or_default();
        if bucket.contains_key(&id) {
            log::debug!("marker {id:?} at t={time} already exists");
            return;
        }

        let visual_id = VisualId(self.next_visual_id);
        self.next_visual_id += 1;

        let mut marker = Marker::new(shape, extent, &self.axes, mask, position, visual_id);
        if time == self.current_timestep {
            marker.show(&mut self.scene, &self.options);
        }
        log::trace!("added {shape:?} marker {id:?} at t={time} as {:?}", marker.state());
        bucket.insert(id, marker);

        if self.slice_position.is_none() {
            self.slice_position = Some(position);
        }
    }

    /// Removes the marker for `id` at `time`, detaching its visual.
    pub fn remove(&mut self, time: Timestep, id: &K) {
        let Some(bucket) = self.buckets.get_mut(&time) else {
            log::debug!("no markers at t={time}, nothing to remove");
            return;
        };
        match bucket.remove(id) {
            Some(mut marker) => marker.hide(&mut self.scene),
            None => log::debug!("marker {id:?} at t={time} not found"),
        }
        if bucket.is_empty() {
            self.buckets.remove(&time);
        }
    }

    /// Makes `time` the displayed timestep.
    ///
    /// Markers of the previous timestep are detached; markers of `time` are
    /// reclassified against the last known slice position and attached.
    /// Calling this again with the same value touches nothing.
    pub fn change_timestep(&mut self, time: Timestep) {
        if time != self.current_timestep {
            if let Some(bucket) = self.buckets.get_mut(&self.current_timestep) {
                for marker in bucket.values_mut() {
                    marker.hide(&mut self.scene);
                }
            }
            log::debug!("timestep {} -> {time}", self.current_timestep);
            self.current_timestep = time;
        }

        let Some(bucket) = self.buckets.get_mut(&time) else {
            return;
        };
        for marker in bucket.values_mut() {
            let changed = self
                .slice_position
                .map_or(false, |position| marker.reclassify(position));
            if !marker.is_attached() {
                marker.show(&mut self.scene, &self.options);
            } else if changed {
                marker.sync(&mut self.scene, &self.options, false);
            }
        }
    }

    /// Moves the slice of the current timestep to `position`.
    ///
    /// Markers whose state changes get a new payload; the rest only have
    /// their geometry refreshed. Other timesteps are left alone.
    pub fn change_slice_position(&mut self, position: f32) {
        if !position.is_finite() {
            log::warn!("ignoring non-finite slice position {position}");
            return;
        }
        self.slice_position = Some(position);

        let Some(bucket) = self.buckets.get_mut(&self.current_timestep) else {
            return;
        };
        for (id, marker) in bucket.iter_mut() {
            let before = marker.state();
            if marker.reclassify(position) {
                log::trace!("marker {id:?}: {before:?} -> {:?}", marker.state());
            }
            marker.sync(&mut self.scene, &self.options, false);
        }
    }

    /// Re-applies geometry to all visuals of the current timestep.
    ///
    /// Call after the scene's projection changed (scroll, zoom, flip).
    pub fn refresh_visuals(&mut self) {
        let Some(bucket) = self.buckets.get_mut(&self.current_timestep) else {
            return;
        };
        for marker in bucket.values_mut() {
            marker.sync(&mut self.scene, &self.options, false);
        }
    }

    /// Detaches and discards every marker of every timestep.
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            for marker in bucket.values_mut() {
                marker.hide(&mut self.scene);
            }
        }
        self.buckets.clear();
    }

    /// Replaces the appearance options and re-renders the current timestep.
    pub fn set_options(&mut self, options: MarkerOptions) {
        self.options = options;
        self.rerender_all();
    }

    /// Rebinds the view to new axes.
    ///
    /// `position` is the slice position along the new depth axis. Every
    /// marker re-derives its footprint and depth range from its extent.
    /// A non-finite `position` forgets the last known slice position, since
    /// it referred to the old depth axis, and leaves states unchanged until
    /// the next [`change_slice_position`](Self::change_slice_position).
    pub fn set_axes(&mut self, axes: ViewAxes, position: f32) {
        self.axes = axes;
        self.slice_position = if position.is_finite() {
            Some(position)
        } else {
            log::warn!("non-finite slice position {position} for new axes, classification kept");
            None
        };
        for bucket in self.buckets.values_mut() {
            for marker in bucket.values_mut() {
                marker.rebind(&axes);
                if let Some(position) = self.slice_position {
                    marker.reclassify(position);
                }
            }
        }
        self.rerender_all();
    }

    fn rerender_all(&mut self) {
        for (time, bucket) in &mut self.buckets {
            for marker in bucket.values_mut() {
                if *time == self.current_timestep {
                    marker.sync(&mut self.scene, &self.options, true);
                } else {
                    marker.invalidate();
                }
            }
        }
    }

    /// Returns whether a marker exists for `id` at `time`.
    pub fn contains(&self, time: Timestep, id: &K) -> bool {
        self.buckets
            .get(&time)
            .map_or(false, |bucket| bucket.contains_key(id))
    }

    /// Gets the marker for `id` at `time`.
    pub fn get(&self, time: Timestep, id: &K) -> Option<&Marker> {
        self.buckets.get(&time)?.get(id)
    }

    /// Returns the depth state of the marker for `id` at `time`.
    pub fn state_of(&self, time: Timestep, id: &K) -> Option<DepthState> {
        self.get(time, id).map(Marker::state)
    }

    /// Returns the visual last rendered for `id` at `time`.
    pub fn visual_of(&self, time: Timestep, id: &K) -> Option<&Visual> {
        self.get(time, id)?.visual()
    }

    /// Returns an iterator over the markers of `time`.
    pub fn markers_at(&self, time: Timestep) -> impl Iterator<Item = (&K, &Marker)> {
        self.buckets.get(&time).into_iter().flat_map(|bucket| bucket.iter())
    }

    /// Returns the total number of markers across all timesteps.
    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    /// Returns true if no markers are registered.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(HashMap::is_empty)
    }

    /// Returns the number of markers at `time`.
    pub fn timestep_len(&self, time: Timestep) -> usize {
        self.buckets.get(&time).map_or(0, HashMap::len)
    }

    pub fn current_timestep(&self) -> Timestep {
        self.current_timestep
    }

    /// Returns the last slice position reported to the registry.
    pub fn slice_position(&self) -> Option<f32> {
        self.slice_position
    }

    pub fn axes(&self) -> &ViewAxes {
        &self.axes
    }

    pub fn options(&self) -> &MarkerOptions {
        &self.options
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, e.g. to change its projection before
    /// calling [`refresh_visuals`](Self::refresh_visuals).
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use proptest::prelude::*;

    use super::*;
    use crate::extent::Axis;
    use crate::scene::{Flip, HeadlessScene, Orientation, SceneEvent};
    use crate::visual::{Payload, PayloadKind};

    type TestRegistry = MarkerRegistry<&'static str, HeadlessScene>;

    fn registry() -> TestRegistry {
        MarkerRegistry::new(
            HeadlessScene::new(),
            ViewAxes::default(),
            MarkerOptions::default(),
        )
    }

    fn cell_extent() -> ObjectExtent {
        ObjectExtent::from_bounds(Vec3::splat(2.0), Vec3::splat(8.0)).unwrap()
    }

    fn cell_mask() -> SliceMask {
        SliceMask::solid(6, 6)
    }

    fn attached_kind(registry: &TestRegistry, time: Timestep, id: &'static str) -> PayloadKind {
        let id = registry.get(time, &id).unwrap().visual_id();
        registry.scene().get(id).unwrap().kind()
    }

    #[test]
    fn test_add_active_cell() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), Some(cell_mask()), 5.0);

        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
        assert_eq!(registry.scene().num_attached(), 1);
        match &registry.visual_of(0, &"cell1").unwrap().payload {
            Payload::Rect { rect } => {
                let margin = registry.options().margin;
                assert_eq!(rect.min, Vec2::splat(2.0 - margin));
                assert_eq!(rect.max, Vec2::splat(8.0 + margin));
            }
            other => panic!("expected rect, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_slice_walk_through_states() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), Some(cell_mask()), 5.0);

        registry.change_slice_position(1.0);
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::BelowRange));
        assert_eq!(attached_kind(&registry, 0, "cell1"), PayloadKind::Outline);
        let outline = registry.get(0, &"cell1").unwrap().silhouettes().unwrap().outline.clone();
        let shown = registry.visual_of(0, &"cell1").unwrap().payload.image().unwrap();
        assert!(std::sync::Arc::ptr_eq(shown, &outline));

        registry.change_slice_position(9.0);
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::AboveRange));
        assert_eq!(attached_kind(&registry, 0, "cell1"), PayloadKind::Filled);

        registry.change_slice_position(5.0);
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
        assert_eq!(attached_kind(&registry, 0, "cell1"), PayloadKind::Rect);
        assert!(registry.visual_of(0, &"cell1").unwrap().payload.image().is_none());
    }

    #[test]
    fn test_state_change_swaps_payload_and_same_state_updates() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), None, 5.0);
        let id = registry.get(0, &"cell1").unwrap().visual_id();
        registry.scene_mut().clear_events();

        registry.change_slice_position(6.0);
        assert_eq!(
            registry.scene().events(),
            &[SceneEvent::Update(id, PayloadKind::Rect)]
        );

        registry.scene_mut().clear_events();
        registry.change_slice_position(0.0);
        assert_eq!(
            registry.scene().events(),
            &[
                SceneEvent::Detach(id),
                SceneEvent::Attach(id, PayloadKind::Outline)
            ]
        );
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), Some(cell_mask()), 5.0);
        let events = registry.scene().events().len();

        let other = ObjectExtent::from_bounds(Vec3::ZERO, Vec3::ONE).unwrap();
        registry.add(0, "cell1", other, None, 100.0);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.scene().events().len(), events);
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
        assert_eq!(registry.get(0, &"cell1").unwrap().extent(), &cell_extent());
    }

    #[test]
    fn test_other_timestep_is_not_attached() {
        let mut registry = registry();
        registry.add(3, "cell1", cell_extent(), None, 5.0);
        assert!(registry.contains(3, &"cell1"));
        assert_eq!(registry.scene().num_attached(), 0);
        assert!(!registry.get(3, &"cell1").unwrap().is_attached());
    }

    #[test]
    fn test_remove_detaches_and_missing_is_noop() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), None, 5.0);
        registry.add(0, "cell2", cell_extent(), None, 5.0);

        registry.remove(0, &"cell1");
        assert!(!registry.contains(0, &"cell1"));
        assert_eq!(registry.scene().num_attached(), 1);

        let events = registry.scene().events().len();
        registry.remove(0, &"cell1");
        registry.remove(7, &"cell2");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.scene().events().len(), events);
    }

    #[test]
    fn test_change_timestep_swaps_attached_sets() {
        let mut registry = registry();
        registry.add(0, "a", cell_extent(), None, 5.0);
        registry.add(1, "b", cell_extent(), None, 5.0);
        let a = registry.get(0, &"a").unwrap().visual_id();
        let b = registry.get(1, &"b").unwrap().visual_id();

        registry.change_timestep(1);
        assert_eq!(registry.current_timestep(), 1);
        assert!(!registry.scene().is_attached(a));
        assert!(registry.scene().is_attached(b));
        // state objects of the hidden timestep persist
        assert!(registry.contains(0, &"a"));

        registry.change_timestep(0);
        assert!(registry.scene().is_attached(a));
        assert!(!registry.scene().is_attached(b));
    }

    #[test]
    fn test_change_timestep_twice_is_idempotent() {
        let mut registry = registry();
        registry.add(1, "a", cell_extent(), None, 5.0);
        registry.add(1, "b", cell_extent(), None, 5.0);

        registry.change_timestep(1);
        let attached: Vec<_> = registry.scene().attached_ids().collect();
        registry.scene_mut().clear_events();

        registry.change_timestep(1);
        assert!(registry.scene().events().is_empty());
        assert_eq!(registry.scene().attached_ids().collect::<Vec<_>>(), attached);
    }

    #[test]
    fn test_hidden_timestep_reclassified_on_show() {
        let mut registry = registry();
        registry.add(1, "late", cell_extent(), None, 5.0);

        // only timestep 0 is touched
        registry.change_slice_position(20.0);
        assert_eq!(registry.state_of(1, &"late"), Some(DepthState::Active));

        registry.change_timestep(1);
        assert_eq!(registry.state_of(1, &"late"), Some(DepthState::AboveRange));
        assert_eq!(attached_kind(&registry, 1, "late"), PayloadKind::Filled);
    }

    #[test]
    fn test_slice_change_on_empty_timestep_is_noop() {
        let mut registry = registry();
        registry.add(2, "cell1", cell_extent(), None, 5.0);
        registry.change_timestep(4);
        registry.change_slice_position(0.0);
        registry.refresh_visuals();
        assert_eq!(registry.slice_position(), Some(0.0));
        assert_eq!(registry.scene().num_attached(), 0);
    }

    #[test]
    fn test_non_finite_slice_position_is_ignored() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), None, 5.0);
        registry.change_slice_position(f32::NAN);
        assert_eq!(registry.slice_position(), Some(5.0));
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
    }

    #[test]
    fn test_refresh_visuals_follows_scene_projection() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), None, 5.0);
        registry.scene_mut().set_scale(2.0).set_orientation(Orientation {
            rotation_degrees: 0.0,
            vertical_flip: Flip::Flipped,
        });
        registry.scene_mut().clear_events();

        registry.refresh_visuals();
        let id = registry.get(0, &"cell1").unwrap().visual_id();
        assert_eq!(
            registry.scene().events(),
            &[SceneEvent::Update(id, PayloadKind::Rect)]
        );
        match &registry.scene().get(id).unwrap().payload {
            Payload::Rect { rect } => {
                assert_eq!(rect.min, Vec2::new(2.0, -18.0));
                assert_eq!(rect.max, Vec2::new(18.0, -2.0));
            }
            other => panic!("expected rect, got {:?}", other.kind()),
        }
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut registry = registry();
        registry.add(0, "a", cell_extent(), None, 5.0);
        registry.add(1, "b", cell_extent(), None, 5.0);
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.scene().num_attached(), 0);

        let events = registry.scene().events().len();
        registry.remove(0, &"a");
        registry.change_slice_position(1.0);
        assert_eq!(registry.scene().events().len(), events);
    }

    #[test]
    fn test_close_returns_empty_scene() {
        let mut registry = registry();
        registry.add(0, "a", cell_extent(), None, 5.0);
        let scene = registry.close();
        assert_eq!(scene.num_attached(), 0);
    }

    #[test]
    fn test_set_options_restyles_current_timestep() {
        let mut registry = registry();
        registry.add(0, "a", cell_extent(), None, 5.0);
        registry.add(1, "b", cell_extent(), None, 5.0);

        let mut options = MarkerOptions::default();
        options.active.width = 6.0;
        registry.set_options(options);

        let id = registry.get(0, &"a").unwrap().visual_id();
        assert_eq!(registry.scene().get(id).unwrap().stroke.width, 6.0);

        registry.change_timestep(1);
        let id = registry.get(1, &"b").unwrap().visual_id();
        assert_eq!(registry.scene().get(id).unwrap().stroke.width, 6.0);
    }

    #[test]
    fn test_set_axes_rederives_depth() {
        let mut registry = registry();
        let extent =
            ObjectExtent::from_bounds(Vec3::new(0.0, 0.0, 10.0), Vec3::new(4.0, 4.0, 12.0))
                .unwrap();
        registry.add(0, "flat", extent, None, 11.0);
        assert_eq!(registry.state_of(0, &"flat"), Some(DepthState::Active));

        registry.set_axes(ViewAxes::orthogonal_to(Axis::X), 6.0);
        assert_eq!(registry.state_of(0, &"flat"), Some(DepthState::AboveRange));
        assert_eq!(attached_kind(&registry, 0, "flat"), PayloadKind::Filled);
    }

    #[test]
    fn test_point_markers() {
        let mut registry = registry();
        registry.add_point(0, "spot", cell_extent(), 5.0);
        assert_eq!(attached_kind(&registry, 0, "spot"), PayloadKind::Cross);

        registry.change_slice_position(50.0);
        assert_eq!(registry.state_of(0, &"spot"), Some(DepthState::AboveRange));
        assert_eq!(attached_kind(&registry, 0, "spot"), PayloadKind::CrossedOut);
        let visual = registry.visual_of(0, &"spot").unwrap();
        assert_eq!(visual.stroke, registry.options().inactive);

        registry.change_slice_position(-50.0);
        assert_eq!(registry.state_of(0, &"spot"), Some(DepthState::BelowRange));
        assert_eq!(attached_kind(&registry, 0, "spot"), PayloadKind::Cross);
    }

    #[test]
    fn test_set_axes_non_finite_forgets_position() {
        let mut registry = registry();
        registry.add(0, "cell1", cell_extent(), None, 5.0);
        registry.set_axes(ViewAxes::orthogonal_to(Axis::X), f32::NAN);

        assert_eq!(registry.slice_position(), None);
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::Active));
        assert_eq!(registry.axes().depth, Axis::X);

        registry.change_slice_position(1.0);
        assert_eq!(registry.state_of(0, &"cell1"), Some(DepthState::BelowRange));
    }

    #[test]
    fn test_huge_extent_without_mask() {
        let mut registry = registry();
        let extent =
            ObjectExtent::from_bounds(Vec3::ZERO, Vec3::new(5.0e9, 1.0, 1.0)).unwrap();
        registry.add(0, "big", extent, None, 0.5);
        assert_eq!(registry.state_of(0, &"big"), Some(DepthState::Active));

        registry.change_slice_position(3.0);
        assert_eq!(attached_kind(&registry, 0, "big"), PayloadKind::Filled);
        let silhouettes = registry.get(0, &"big").unwrap().silhouettes().unwrap();
        assert!(silhouettes.filled.width() <= crate::mask::MAX_SOLID_EDGE + 2);
    }

    proptest! {
        #[test]
        fn repeated_add_matches_single_add(
            low in -50.0f32..50.0,
            len in 0.0f32..20.0,
            position in -100.0f32..100.0,
            repeats in 1usize..4,
        ) {
            let extent = ObjectExtent::from_bounds(
                Vec3::splat(low),
                Vec3::splat(low + len),
            ).unwrap();

            let mut once = registry();
            once.add(0, "obj", extent, None, position);

            let mut many = registry();
            for _ in 0..repeats {
                many.add(0, "obj", extent, None, position);
            }

            prop_assert_eq!(once.len(), many.len());
            prop_assert_eq!(once.state_of(0, &"obj"), many.state_of(0, &"obj"));
            prop_assert_eq!(once.scene().events(), many.scene().events());
        }

        #[test]
        fn state_tracks_last_slice_position(
            positions in proptest::collection::vec(-20.0f32..20.0, 1..10),
        ) {
            let mut registry = registry();
            registry.add(0, "cell1", cell_extent(), None, 5.0);
            for &position in &positions {
                registry.change_slice_position(position);
            }
            let last = *positions.last().unwrap();
            let expected = registry.get(0, &"cell1").unwrap().depth_range().classify(last);
            prop_assert_eq!(registry.state_of(0, &"cell1"), Some(expected));
            let visual = registry.visual_of(0, &"cell1").unwrap();
            prop_assert_eq!(visual.state, expected);
        }
    }
}
