//! Property-based tests for the geometry kernel
//!
//! These use proptest to check the algebraic laws every operation must keep
//! over well-formed rectangles.

use super::*;
use proptest::prelude::*;

prop_compose! {
    fn any_rect()(
        x0 in -1000i32..1000,
        y0 in -1000i32..1000,
        x1 in -1000i32..1000,
        y1 in -1000i32..1000,
    ) -> Rect<i32> {
        rt(x0, y0, x1, y1)
    }
}

fn well_formed(r: &Rect<i32>) -> bool {
    r.min.x <= r.max.x && r.min.y <= r.max.y
}

proptest! {
    #[test]
    fn prop_union_is_idempotent(r in any_rect(), s in any_rect()) {
        let u = r.union(s);
        prop_assert_eq!(u.union(s), u);
        prop_assert!(well_formed(&u));
    }

    #[test]
    fn prop_intersection_is_inside_both(r in any_rect(), s in any_rect()) {
        let i = r.intersect(s);
        prop_assert!(well_formed(&i));
        if !i.is_empty() {
            prop_assert!(i.is_in(&r));
            prop_assert!(i.is_in(&s));
        }
    }

    #[test]
    fn prop_reversed_corners_equal_canon(r in any_rect()) {
        let reversed = rt(r.max.x, r.max.y, r.min.x, r.min.y);
        prop_assert_eq!(reversed, r.canon());
        let raw = Rect::new(r.max, r.min);
        prop_assert_eq!(raw.canon(), r);
    }

    #[test]
    fn prop_inset_never_inverts(r in any_rect(), n in -50i32..500) {
        let shrunk = r.inset(n);
        prop_assert!(well_formed(&shrunk));
    }

    #[test]
    fn prop_closest_in_fits_or_is_empty(r in any_rect(), b in any_rect()) {
        let c = r.closest_in(b);
        prop_assert!(well_formed(&c));
        if !c.is_empty() {
            prop_assert!(c.is_in(&b));
            prop_assert_eq!(c.size(), r.size());
        }
    }

    #[test]
    fn prop_wrap_in_lands_inside(x in -5000i32..5000, y in -5000i32..5000, r in any_rect()) {
        prop_assume!(!r.is_empty());
        prop_assert!(Point::new(x, y).wrap_in(r).is_in(r));
    }

    #[test]
    fn prop_with_aspect_fits(r in any_rect(), ax in 1i32..50, ay in 1i32..50) {
        let a = r.with_aspect(Point::new(ax, ay));
        prop_assert!(well_formed(&a));
        prop_assert!(a.is_in(&r));
    }
}
