//! Orthogonal Views Demo
//!
//! Registers a few detections in three headless slice views and walks the
//! Z slice through them, printing what each view would draw:
//! - a cell with a footprint mask
//! - a mask-less cell (solid footprint)
//! - a point detection
//!
//! Run with: RUST_LOG=debug cargo run --example ortho_views_demo

use hilite_rs::*;

fn describe(views: &OrthoViews<&'static str, HeadlessScene>, axis: Axis) {
    let view = views.view(axis);
    for (id, marker) in view.markers_at(view.current_timestep()) {
        let kind = marker.visual().map(Visual::kind);
        println!(
            "  [{axis:?}] {id:<6} {:<10} {:?}",
            format!("{:?}", marker.state()),
            kind
        );
    }
}

fn disc_mask(size: u32) -> Result<SliceMask> {
    let r = size as f32 / 2.0;
    let data = (0..size * size)
        .map(|i| {
            let (x, y) = ((i % size) as f32 + 0.5, (i / size) as f32 + 0.5);
            u8::from((x - r).powi(2) + (y - r).powi(2) < (r - 1.0).powi(2))
        })
        .collect();
    SliceMask::from_raw(size, size, data)
}

fn main() -> Result<()> {
    init_logging();

    let mut views: OrthoViews<&'static str, HeadlessScene> = OrthoViews::new(
        [HeadlessScene::new(), HeadlessScene::new(), HeadlessScene::new()],
        &MarkerOptions::default(),
    );

    let cursor = Vec3::new(10.0, 10.0, 10.0);
    let cell = ObjectExtent::from_bounds(Vec3::new(4.0, 4.0, 8.0), Vec3::new(16.0, 16.0, 12.0))?;
    views.add(0, &"cell", cell, [None, None, Some(disc_mask(12)?)], cursor);

    let plain = ObjectExtent::from_bounds(Vec3::new(20.0, 2.0, 14.0), Vec3::new(26.0, 8.0, 18.0))?;
    views.add(0, &"plain", plain, [None, None, None], cursor);

    let spot = ObjectExtent::from_bounds(Vec3::new(12.0, 12.0, 9.0), Vec3::new(12.0, 12.0, 9.0))?;
    views.add_point(0, &"spot", spot, cursor);

    for z in [6.0, 9.0, 10.0, 16.0, 20.0] {
        views.change_slice(Axis::Z, z);
        println!("z = {z}");
        describe(&views, Axis::Z);
    }

    views.view_mut(Axis::Z).scene_mut().set_orientation(Orientation {
        rotation_degrees: 90.0,
        vertical_flip: Flip::Flipped,
    });
    views.refresh_visuals();
    println!("after rotating the Z view");
    describe(&views, Axis::Z);

    let scenes = views.close();
    for (axis, scene) in Axis::ALL.iter().zip(&scenes) {
        println!("{axis:?} view: {} scene calls", scene.events().len());
    }

    Ok(())
}
