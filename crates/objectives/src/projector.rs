//! Screen-edge direction arrow for the current objective.
//!
//! Only the horizontal bearing to the target matters: the target is moved to
//! the camera's height before projection. Targets behind the camera are
//! mirrored through the screen centre so the arrow keeps pointing the way
//! the player has to turn, and the rotation stays continuous as the target
//! crosses the side of the view frustum. Off-screen points are pulled back
//! onto the padded screen rectangle along their bearing from the centre.
//!
//! Screen space is in pixels, origin top-left, y down. Rotations are
//! `atan2(dy, dx)` in that space, so positive angles turn clockwise on screen.

use engine_core::{Camera, Viewport};
use glam::{Vec2, Vec3};

/// Smallest clip-space depth used for the perspective divide.
const MIN_DEPTH: f32 = 1e-4;
/// Bearings shorter than this (pixels) keep the previous rotation.
const MIN_BEARING: f32 = 1e-3;

/// Where to draw the arrow and which way it points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPlacement {
    pub screen_position: Vec2,
    pub rotation: f32,
}

/// Screen position of `target` flattened to the camera's height, mirrored
/// through the screen centre when the target is behind the camera.
/// Not clamped; points far off-screen are returned as-is.
pub fn project_to_screen(camera: &Camera, target: Vec3, viewport: Viewport) -> Vec2 {
    let eye = camera.position();
    let flat = Vec3::new(target.x, eye.y, target.z);
    let to_target = (flat - eye).normalize_or_zero();
    if to_target == Vec3::ZERO {
        return viewport.center();
    }
    let behind = camera.forward().dot(to_target) < 0.0;

    let clip = camera.world_to_clip(flat);
    // `clip.w` has the sign of the dot product above; keep it away from zero.
    let depth = clip.w.abs().max(MIN_DEPTH);
    let w = if behind { -depth } else { depth };
    let ndc = Vec2::new(clip.x / w, clip.y / w);

    let center = viewport.center();
    let screen = Vec2::new((ndc.x + 1.0) * center.x, (1.0 - ndc.y) * center.y);
    if behind {
        2.0 * center - screen
    } else {
        screen
    }
}

/// Pull `point` onto the rectangle inset by `padding` from every edge,
/// moving along the ray from the screen centre. Points already inside are
/// returned unchanged.
pub fn clamp_to_padded_rect(point: Vec2, viewport: Viewport, padding: f32) -> Vec2 {
    let center = viewport.center();
    let half = (center - Vec2::splat(padding)).max(Vec2::ZERO);
    let offset = point - center;
    if offset.x.abs() <= half.x && offset.y.abs() <= half.y {
        return point;
    }
    // Whichever edge the ray reaches first.
    let tx = if offset.x != 0.0 { half.x / offset.x.abs() } else { f32::INFINITY };
    let ty = if offset.y != 0.0 { half.y / offset.y.abs() } else { f32::INFINITY };
    center + offset * tx.min(ty)
}

/// Full indicator placement. `previous_rotation` is returned unchanged when
/// the bearing is degenerate (target straight above/below the camera).
pub fn project_indicator(
    camera: &Camera,
    target: Vec3,
    viewport: Viewport,
    padding: f32,
    previous_rotation: f32,
) -> IndicatorPlacement {
    let screen = project_to_screen(camera, target, viewport);
    let bearing = screen - viewport.center();
    let rotation = if bearing.length_squared() > MIN_BEARING * MIN_BEARING {
        bearing.y.atan2(bearing.x)
    } else {
        previous_rotation
    };
    IndicatorPlacement {
        screen_position: clamp_to_padded_rect(screen, viewport, padding),
        rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn camera(pitch: f32) -> Camera {
        let mut cam = Camera::new(Vec3::new(0.0, 1.7, 0.0));
        cam.set_aspect(viewport());
        cam.set_yaw_pitch(0.0, pitch);
        cam
    }

    /// Point at `degrees` clockwise (seen from above) from the camera's forward (-Z).
    fn at_bearing(degrees: f32, distance: f32, height: f32) -> Vec3 {
        let a = degrees.to_radians();
        Vec3::new(a.sin() * distance, height, -a.cos() * distance)
    }

    fn angle_delta(a: f32, b: f32) -> f32 {
        let mut d = (a - b) % (2.0 * PI);
        if d > PI {
            d -= 2.0 * PI;
        } else if d < -PI {
            d += 2.0 * PI;
        }
        d.abs()
    }

    #[test]
    fn target_in_view_is_not_moved() {
        let cam = camera(0.0);
        let raw = project_to_screen(&cam, at_bearing(10.0, 30.0, 1.7), viewport());
        let placement = project_indicator(&cam, at_bearing(10.0, 30.0, 1.7), viewport(), 48.0, 0.0);
        assert_eq!(placement.screen_position, raw);
        assert!(raw.x > 640.0, "target right of forward should land right of centre");
        assert!((raw.y - 360.0).abs() < 1e-3);
        assert!(placement.rotation.abs() < 1e-4);
    }

    #[test]
    fn height_of_target_does_not_change_direction() {
        let cam = camera(0.0);
        let low = project_indicator(&cam, at_bearing(-120.0, 25.0, -40.0), viewport(), 48.0, 0.0);
        let high = project_indicator(&cam, at_bearing(-120.0, 25.0, 300.0), viewport(), 48.0, 0.0);
        assert!((low.screen_position - high.screen_position).length() < 1e-2);
        assert!(angle_delta(low.rotation, high.rotation) < 1e-4);
    }

    #[test]
    fn target_behind_points_to_its_side() {
        let cam = camera(0.0);
        let right = project_indicator(&cam, at_bearing(150.0, 20.0, 0.0), viewport(), 48.0, 0.0);
        let left = project_indicator(&cam, at_bearing(-150.0, 20.0, 0.0), viewport(), 48.0, 0.0);
        assert!(right.screen_position.x > 640.0);
        assert!(left.screen_position.x < 640.0);
        assert!(right.rotation.abs() < 0.01);
        assert!(angle_delta(left.rotation, PI) < 0.01);
    }

    #[test]
    fn rotation_is_continuous_across_the_side_of_the_frustum() {
        for pitch in [0.0, -0.35, 0.25] {
            let cam = camera(pitch);
            for side in [90.0_f32, -90.0] {
                let mut previous = None;
                let mut step = -10.0;
                while step <= 10.0 {
                    let bearing = side + step;
                    let p = project_indicator(&cam, at_bearing(bearing, 15.0, 0.0), viewport(), 48.0, 0.0);
                    assert!(p.rotation.is_finite());
                    if let Some(prev) = previous {
                        assert!(
                            angle_delta(p.rotation, prev) < 0.05,
                            "jump at bearing {} pitch {}: {} -> {}",
                            bearing,
                            pitch,
                            prev,
                            p.rotation
                        );
                    }
                    previous = Some(p.rotation);
                    step += 0.25;
                }
            }
        }
    }

    #[test]
    fn clamped_point_lies_on_padded_edge_along_same_bearing() {
        let vp = viewport();
        let padding = 48.0;
        let cam = camera(-0.3);
        for bearing in [-100.0_f32, -85.0, -60.0, 55.0, 80.0, 95.0, 110.0] {
            let target = at_bearing(bearing, 40.0, 0.0);
            let raw = project_to_screen(&cam, target, vp);
            let placement = project_indicator(&cam, target, vp, padding, 0.0);
            let p = placement.screen_position;
            let (min, max) = (Vec2::splat(padding), vp.size() - Vec2::splat(padding));
            let inside = |q: Vec2| q.x >= min.x && q.x <= max.x && q.y >= min.y && q.y <= max.y;
            assert!(!inside(raw), "bearing {} expected off-screen", bearing);
            assert!(p.x >= min.x - 1e-2 && p.x <= max.x + 1e-2);
            assert!(p.y >= min.y - 1e-2 && p.y <= max.y + 1e-2);
            let on_edge = (p.x - min.x).abs() < 1e-2
                || (p.x - max.x).abs() < 1e-2
                || (p.y - min.y).abs() < 1e-2
                || (p.y - max.y).abs() < 1e-2;
            assert!(on_edge, "bearing {}: {:?} not on padded edge", bearing, p);
            let angle = |q: Vec2| (q.y - vp.center().y).atan2(q.x - vp.center().x);
            let raw_angle = angle(raw);
            let clamped_angle = angle(p);
            assert!(angle_delta(raw_angle, clamped_angle) < 1e-3);
            assert!(angle_delta(placement.rotation, raw_angle) < 1e-3);
        }
    }

    #[test]
    fn clamp_picks_the_edge_hit_first() {
        let vp = Viewport::new(200.0, 100.0);
        // Shallow slope: the right edge is reached before the bottom edge.
        let p = clamp_to_padded_rect(Vec2::new(400.0, 100.0), vp, 10.0);
        assert!((p.x - 190.0).abs() < 1e-4);
        assert!((p.y - 65.0).abs() < 1e-3);
        // Steep slope: bottom edge first.
        let q = clamp_to_padded_rect(Vec2::new(120.0, 500.0), vp, 10.0);
        assert!((q.y - 90.0).abs() < 1e-4);
        assert!((q.x - 101.778).abs() < 1e-2);
        // Inside: untouched.
        assert_eq!(clamp_to_padded_rect(Vec2::new(30.0, 20.0), vp, 10.0), Vec2::new(30.0, 20.0));
    }

    #[test]
    fn degenerate_bearing_keeps_previous_rotation() {
        let cam = camera(0.0);
        let above = cam.position() + Vec3::Y * 50.0;
        let placement = project_indicator(&cam, above, viewport(), 48.0, 1.25);
        assert_eq!(placement.rotation, 1.25);
        assert!(placement.screen_position.is_finite());
    }
}
