//! Property-based invariant tests for geometry primitives (Rect, Point).
//!
//! 1. Edge invariants: right = left + width, bottom = top + height.
//! 2. Overlap is symmetric and agrees with `intersection_opt`.
//! 3. Intersection result fits within both inputs.
//! 4. Union contains both inputs.
//! 5. Distance is symmetric, non-negative, and obeys the triangle inequality.
//! 6. Center lies inside its rectangle; corners lie on its edges.
//! 7. Translation preserves size and distances between centers shift uniformly.

use keydrop_core::geometry::{Point, Rect, center, corners, distance};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

// Integer-valued coordinates keep the arithmetic exact.
fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-500i32..=500, -500i32..=500, 0i32..=300, 0i32..=300).prop_map(|(x, y, w, h)| {
        Rect::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h))
    })
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-1000i32..=1000, -1000i32..=1000).prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Edge invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn right_bottom_consistent(rect in rect_strategy()) {
        prop_assert_eq!(rect.right(), rect.left + rect.width);
        prop_assert_eq!(rect.bottom(), rect.top + rect.height);
        prop_assert!(rect.width >= 0.0 && rect.height >= 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Overlap symmetry and agreement with intersection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overlap_symmetric_and_matches_intersection(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert_eq!(a.overlaps(&b), a.intersection_opt(&b).is_some());
        prop_assert_eq!(
            a.overlaps(&b),
            a.left < b.right() && a.right() > b.left && a.top < b.bottom() && a.bottom() > b.top
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Intersection fits within both inputs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_fits_within_both(a in rect_strategy(), b in rect_strategy()) {
        if let Some(inter) = a.intersection_opt(&b) {
            prop_assert!(inter.left >= a.left && inter.left >= b.left);
            prop_assert!(inter.top >= a.top && inter.top >= b.top);
            prop_assert!(inter.right() <= a.right() && inter.right() <= b.right());
            prop_assert!(inter.bottom() <= a.bottom() && inter.bottom() <= b.bottom());
            prop_assert!(inter.area() <= a.area() && inter.area() <= b.area());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Union contains both inputs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn union_contains_both(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(&b);
        for r in [a, b] {
            prop_assert!(u.left <= r.left && u.top <= r.top);
            prop_assert!(u.right() >= r.right() && u.bottom() >= r.bottom());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Distance is a metric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn distance_is_a_metric(a in point_strategy(), b in point_strategy(), c in point_strategy()) {
        prop_assert_eq!(distance(a, b), distance(b, a));
        prop_assert!(distance(a, b) >= 0.0);
        prop_assert_eq!(distance(a, a), 0.0);
        prop_assert!(distance(a, c) <= distance(a, b) + distance(b, c) + 1e-9);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Center and corners
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn center_inside_and_corners_on_edges(rect in rect_strategy()) {
        prop_assert!(rect.contains_point(center(&rect)));
        let [tl, tr, bl, br] = corners(&rect);
        prop_assert_eq!(tl, rect.origin());
        prop_assert_eq!(tr, Point::new(rect.right(), rect.top));
        prop_assert_eq!(bl, Point::new(rect.left, rect.bottom()));
        prop_assert_eq!(br, Point::new(rect.right(), rect.bottom()));
        for corner in [tl, tr, bl, br] {
            prop_assert!(rect.contains_point(corner));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Translation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn translate_preserves_size(rect in rect_strategy(), delta in point_strategy()) {
        let moved = rect.translate(delta);
        prop_assert_eq!(moved.width, rect.width);
        prop_assert_eq!(moved.height, rect.height);
        prop_assert_eq!(moved.origin(), rect.origin() + delta);
        prop_assert_eq!(rect.at(moved.origin()), moved);
    }
}
