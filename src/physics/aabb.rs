/// Axis-Aligned Bounding Box functions
///
/// Pure functions over plain AABB data. The kinematic world resolves every
/// collider, capsules included, through these boxes.

use glam::Vec3;

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Create AABB from center point and half extents
/// Pure function - transforms center/extents into AABB bounds
pub fn aabb_from_center_half_extents(center: Vec3, half_extents: Vec3) -> Aabb {
    Aabb {
        min: center - half_extents,
        max: center + half_extents,
    }
}

/// Get center point of AABB
pub fn aabb_center(aabb: &Aabb) -> Vec3 {
    (aabb.min + aabb.max) * 0.5
}

/// Get half extents of AABB
pub fn aabb_half_extents(aabb: &Aabb) -> Vec3 {
    (aabb.max - aabb.min) * 0.5
}

/// Test if two AABBs intersect (touching counts)
pub fn aabb_intersects(a: &Aabb, b: &Aabb) -> bool {
    a.min.cmple(b.max).all() && a.max.cmpge(b.min).all()
}

/// Test if two AABBs overlap with positive depth on one axis
/// Pure function - touching faces do not overlap
pub fn aabb_overlaps_on_axis(a: &Aabb, b: &Aabb, axis: usize) -> bool {
    a.min[axis] < b.max[axis] && a.max[axis] > b.min[axis]
}

/// Test if AABB contains a point
pub fn aabb_contains_point(aabb: &Aabb, point: Vec3) -> bool {
    point.cmpge(aabb.min).all() && point.cmple(aabb.max).all()
}

/// Create translated copy of AABB
pub fn aabb_translated(aabb: &Aabb, offset: Vec3) -> Aabb {
    Aabb {
        min: aabb.min + offset,
        max: aabb.max + offset,
    }
}

/// Clamp a displacement along one axis so `moving` stops `skin` short of `other`
/// Pure function - returns `delta` untouched when `other` is not in the way
///
/// `other` blocks only when the boxes overlap strictly on both remaining axes
/// and it lies ahead of `moving` in the direction of travel. A box already
/// closer than `skin` yields zero motion toward it, never a push-back.
pub fn aabb_clamp_axis_motion(moving: &Aabb, other: &Aabb, axis: usize, delta: f32, skin: f32) -> f32 {
    let in_lane = (0..3)
        .filter(|a| *a != axis)
        .all(|a| aabb_overlaps_on_axis(moving, other, a));
    if !in_lane {
        return delta;
    }

    if delta > 0.0 && moving.max[axis] <= other.min[axis] + skin {
        let allowed = (other.min[axis] - moving.max[axis] - skin).max(0.0);
        delta.min(allowed)
    } else if delta < 0.0 && moving.min[axis] >= other.max[axis] - skin {
        let allowed = -(moving.min[axis] - other.max[axis] - skin).max(0.0);
        delta.max(allowed)
    } else {
        delta
    }
}
