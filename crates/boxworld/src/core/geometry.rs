//! Line intersection and swept-edge classification for hitboxes.
//!
//! Intersection follows Paul Bourke's parametric form: for lines
//! `p1→p2` and `p3→p4`, `ua` and `ub` locate the crossing along each line,
//! with `[0, 1]` meaning "within the segment".

use glam::Vec2;

use crate::api::types::Edge;
use crate::components::hitbox::Hitbox;

/// 2D point or displacement in world units.
pub type Vector = Vec2;

/// Crossing parameters `(ua, ub)` of two lines, or `None` if either
/// segment has zero length or the lines are parallel.
fn crossing_params(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<(f32, f32)> {
    if p1 == p2 || p3 == p4 {
        return None;
    }

    let denominator = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denominator;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denominator;
    Some((ua, ub))
}

fn on_segment(t: f32) -> bool {
    (0.0..=1.0).contains(&t)
}

/// Whether segment `p1→p2` crosses segment `p3→p4`.
///
/// With `extend`, both are treated as infinite lines and only degenerate
/// or parallel input yields `false`.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, extend: bool) -> bool {
    segment_intersection(p1, p2, p3, p4, extend).is_some()
}

/// Point where segment `p1→p2` crosses segment `p3→p4`.
pub fn segment_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, extend: bool) -> Option<Vec2> {
    let (ua, ub) = crossing_params(p1, p2, p3, p4)?;
    if !extend && !(on_segment(ua) && on_segment(ub)) {
        return None;
    }
    Some(p1 + ua * (p2 - p1))
}

/// Whether the finite path `from→to` reaches the infinite line through `a` and `b`.
fn path_crosses_line(from: Vec2, to: Vec2, a: Vec2, b: Vec2) -> bool {
    matches!(crossing_params(from, to, a, b), Some((ua, _)) if on_segment(ua))
}

/// Which edge of `target` the `mover` struck this frame, judged from the
/// path each of its corners swept between `prev_*` and the current position.
///
/// An edge is only a candidate if the mover started entirely on its outer
/// side. Target edges are extended to infinite lines so a mover wider or
/// taller than the target still registers. Corners are tried in the order
/// top-left, top-right, bottom-right, bottom-left, and for each corner the
/// edges in [`Edge::PRIORITY`] order; the first crossing wins.
///
/// `None` means no directional hit: the boxes already overlapped on both
/// axes, or the mover did not move.
pub fn edge_of_collision(mover: &Hitbox, target: &Hitbox) -> Option<Edge> {
    let (w, h) = (mover.width(), mover.height());

    let eligible = |edge: Edge| match edge {
        Edge::Top => mover.prev_y + h <= target.y,
        Edge::Left => mover.prev_x + w <= target.x,
        Edge::Bottom => mover.prev_y >= target.bottom(),
        Edge::Right => mover.prev_x >= target.right(),
    };

    let corners = [
        Vec2::ZERO,
        Vec2::new(w, 0.0),
        Vec2::new(w, h),
        Vec2::new(0.0, h),
    ];
    let before = mover.prev_position();
    let after = mover.position();

    for offset in corners {
        let (from, to) = (before + offset, after + offset);
        for edge in Edge::PRIORITY {
            if !eligible(edge) {
                continue;
            }
            let (a, b) = target.edge(edge);
            if path_crosses_line(from, to, a, b) {
                return Some(edge);
            }
        }
    }

    None
}

/// Straight-line distance between the centres of two hitboxes.
pub fn hitbox_distance(a: &Hitbox, b: &Hitbox) -> f32 {
    a.centre().distance(b.centre())
}
