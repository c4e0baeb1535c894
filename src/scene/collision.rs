//! Shape-pair collision testing.
//!
//! Each component's hitbox is transformed into world space (per-axis scale,
//! then offset from the component position) and tested through one of nine
//! shape-pair routines selected by the two shape tags. The dispatch is
//! symmetric: swapped operands delegate to the same routine with swapped
//! arguments, so `collides(a, b) == collides(b, a)` holds by construction.

use super::hitbox::{HitboxShape, Vec2};
use super::{Scene, SceneComponent};

/// Result of querying one component against the rest of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionOutcome {
    #[default]
    None,
    /// At least one colliding pair had an event-participating side.
    Event,
    /// At least one colliding pair blocked on both sides.
    Blocking,
    EventAndBlocking,
}

impl CollisionOutcome {
    pub fn fires_event(self) -> bool {
        matches!(self, CollisionOutcome::Event | CollisionOutcome::EventAndBlocking)
    }

    pub fn blocks(self) -> bool {
        matches!(self, CollisionOutcome::Blocking | CollisionOutcome::EventAndBlocking)
    }

    fn merge(self, event: bool, blocking: bool) -> Self {
        let event = self.fires_event() || event;
        let blocking = self.blocks() || blocking;
        match (event, blocking) {
            (false, false) => CollisionOutcome::None,
            (true, false) => CollisionOutcome::Event,
            (false, true) => CollisionOutcome::Blocking,
            (true, true) => CollisionOutcome::EventAndBlocking,
        }
    }
}

/// A hitbox resolved into world space.
#[derive(Debug, Clone)]
enum WorldShape {
    Rect { center: Vec2, half: Vec2 },
    Circle { center: Vec2, radius: f32 },
    Polygon { points: Vec<Vec2> },
}

fn world_shape(component: &SceneComponent) -> WorldShape {
    let scale = component.hitbox_scale();
    let hitbox = component.hitbox();
    let center = component.position() + hitbox.offset.scale_by(scale);
    match &hitbox.shape {
        HitboxShape::Rect { size } => WorldShape::Rect {
            center,
            half: size.scale_by(scale) * 0.5,
        },
        // Circles scale with the horizontal axis; non-uniform sprite
        // scaling does not turn the hitbox into an ellipse.
        HitboxShape::Circle { radius } => WorldShape::Circle {
            center,
            radius: radius * scale.x,
        },
        HitboxShape::Polygon { vertices, .. } => WorldShape::Polygon {
            points: vertices
                .iter()
                .map(|v| center + v.scale_by(scale))
                .collect(),
        },
    }
}

/// Tests two components' hitboxes in world space.
pub fn collides(a: &SceneComponent, b: &SceneComponent) -> bool {
    shapes_overlap(&world_shape(a), &world_shape(b))
}

/// Queries `index` against every other live component.
///
/// Pairs where neither side participates in events or blocking are
/// skipped. The outcome is the union across all colliding pairs: an event
/// fires if any pair has an event-participating side; blocking fires only
/// if both sides of some pair block.
pub fn check_collisions(scene: &Scene, index: usize) -> CollisionOutcome {
    let Some(subject) = scene.get(index) else {
        return CollisionOutcome::None;
    };
    let subject_shape = world_shape(subject);

    let mut outcome = CollisionOutcome::None;
    for (other_index, other) in scene.components().iter().enumerate() {
        if other_index == index {
            continue;
        }
        let a = subject.layer();
        let b = other.layer();
        if !a.fires_events() && !a.blocks() && !b.fires_events() && !b.blocks() {
            continue;
        }
        if !shapes_overlap(&subject_shape, &world_shape(other)) {
            continue;
        }
        let event = a.fires_events() || b.fires_events();
        let blocking = a.blocks() && b.blocks();
        outcome = outcome.merge(event, blocking);
    }
    outcome
}

fn shapes_overlap(a: &WorldShape, b: &WorldShape) -> bool {
    use WorldShape::*;
    match (a, b) {
        (Rect { center: ca, half: ha }, Rect { center: cb, half: hb }) => {
            rect_rect(*ca, *ha, *cb, *hb)
        }
        (Circle { center: ca, radius: ra }, Circle { center: cb, radius: rb }) => {
            circle_circle(*ca, *ra, *cb, *rb)
        }
        (Polygon { points: pa }, Polygon { points: pb }) => poly_poly(pa, pb),
        (Rect { center, half }, Circle { center: cc, radius }) => {
            rect_circle(*center, *half, *cc, *radius)
        }
        (Circle { center: cc, radius }, Rect { center, half }) => {
            rect_circle(*center, *half, *cc, *radius)
        }
        (Polygon { points }, Circle { center, radius }) => poly_circle(points, *center, *radius),
        (Circle { center, radius }, Polygon { points }) => poly_circle(points, *center, *radius),
        (Polygon { points }, Rect { center, half }) => poly_poly(points, &rect_points(*center, *half)),
        (Rect { center, half }, Polygon { points }) => poly_poly(&rect_points(*center, *half), points),
    }
}

fn rect_rect(ca: Vec2, ha: Vec2, cb: Vec2, hb: Vec2) -> bool {
    (ca.x - cb.x).abs() < ha.x + hb.x && (ca.y - cb.y).abs() < ha.y + hb.y
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> bool {
    let min_dist = ra + rb;
    (cb - ca).length_squared() < min_dist * min_dist
}

fn rect_circle(center: Vec2, half: Vec2, circle: Vec2, radius: f32) -> bool {
    let closest = Vec2::new(
        circle.x.clamp(center.x - half.x, center.x + half.x),
        circle.y.clamp(center.y - half.y, center.y + half.y),
    );
    (circle - closest).length_squared() < radius * radius
}

fn rect_points(center: Vec2, half: Vec2) -> Vec<Vec2> {
    vec![
        Vec2::new(center.x - half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
    ]
}

fn poly_poly(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    // Containment either way covers one polygon swallowing the other;
    // otherwise some pair of edges must cross.
    if point_in_poly(a[0], b) || point_in_poly(b[0], a) {
        return true;
    }
    for i in 0..a.len() {
        let a1 = a[i];
        let a2 = a[(i + 1) % a.len()];
        for j in 0..b.len() {
            let b1 = b[j];
            let b2 = b[(j + 1) % b.len()];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

fn poly_circle(points: &[Vec2], center: Vec2, radius: f32) -> bool {
    if points.len() < 3 {
        return false;
    }
    if point_in_poly(center, points) {
        return true;
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        if point_segment_distance_squared(center, a, b) < radius * radius {
            return true;
        }
    }
    false
}

/// Even-odd ray cast.
fn point_in_poly(point: Vec2, poly: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let pi = poly[i];
        let pj = poly[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear overlaps count as touching.
    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn point_segment_distance_squared(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (p - a).length_squared();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let projection = a + ab * t;
    (p - projection).length_squared()
}
