//! Geometry kernel
//!
//! Points and half-open, axis-aligned rectangles generic over a signed scalar.
//! The same code serves integer pixel grids (`i32`) and floating point layout
//! coordinates (`f64`).
//!
//! A [`Rect`] is *well-formed* when `min.x <= max.x` and `min.y <= max.y`.
//! It contains every point `p` with `min.x <= p.x < max.x` and
//! `min.y <= p.y < max.y`. Every operation here maps well-formed inputs to a
//! well-formed output. Building a rectangle with [`rt`] swaps coordinates as
//! needed; writing inverted corners straight into the struct is a caller bug
//! and is not checked.
//!
//! All empty rectangles compare equal, whatever their raw coordinates.

use bitflags::bitflags;
use num_traits::{Num, Signed};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Scalar types usable as coordinates.
pub trait Scalar: Num + Signed + Copy + PartialOrd + fmt::Debug {}

impl<T> Scalar for T where T: Num + Signed + Copy + PartialOrd + fmt::Debug {}

fn smin<T: Scalar>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn smax<T: Scalar>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

fn two<T: Scalar>() -> T {
    T::one() + T::one()
}

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Scalar> Point<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Componentwise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(smin(self.x, other.x), smin(self.y, other.y))
    }

    /// Componentwise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(smax(self.x, other.x), smax(self.y, other.y))
    }

    /// Wraps the point into `r` so that `r.contains(result)` holds.
    ///
    /// An empty `r` has nothing to wrap into and the point is returned as is.
    pub fn wrap_in(self, r: Rect<T>) -> Self {
        if r.is_empty() {
            return self;
        }
        let (w, h) = (r.dx(), r.dy());
        let mut p = self - r.min;
        p.x = p.x % w;
        if p.x < T::zero() {
            p.x = p.x + w;
        }
        p.y = p.y % h;
        if p.y < T::zero() {
            p.y = p.y + h;
        }
        p + r.min
    }

    /// Reports whether the point lies inside `r`.
    pub fn is_in(self, r: Rect<T>) -> bool {
        r.contains(self)
    }
}

impl<T: Scalar> Add for Point<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Scalar> Sub for Point<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl<T: Scalar> Neg for Point<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T: Scalar> Mul<T> for Point<T> {
    type Output = Self;

    fn mul(self, k: T) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl<T: Scalar> Div<T> for Point<T> {
    type Output = Self;

    fn div(self, k: T) -> Self {
        Self::new(self.x / k, self.y / k)
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Point<i32> {
    pub fn to_f64(self) -> Point<f64> {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl Point<f64> {
    /// Pixel containing this point.
    pub fn floor(self) -> Point<i32> {
        Point::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// A half-open axis-aligned rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Rect<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

/// Builds a well-formed rectangle from two corners given in any order.
pub fn rt<T: Scalar>(x0: T, y0: T, x1: T, y1: T) -> Rect<T> {
    Rect::new(
        Point::new(smin(x0, x1), smin(y0, y1)),
        Point::new(smax(x0, x1), smax(y0, y1)),
    )
}

impl<T: Scalar> Rect<T> {
    pub const fn new(min: Point<T>, max: Point<T>) -> Self {
        Self { min, max }
    }

    /// The canonical empty rectangle at the origin.
    pub fn zero() -> Self {
        Self::new(Point::zero(), Point::zero())
    }

    /// A rectangle of `size` anchored at the origin.
    pub fn from_size(size: Point<T>) -> Self {
        rt(T::zero(), T::zero(), size.x, size.y)
    }

    pub fn from_origin_size(origin: Point<T>, size: Point<T>) -> Self {
        Self::from_size(size).translate(origin)
    }

    pub fn dx(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn dy(&self) -> T {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Point<T> {
        Point::new(self.dx(), self.dy())
    }

    pub fn area(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            self.dx() * self.dy()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Swaps inverted coordinates back into a well-formed rectangle.
    pub fn canon(self) -> Self {
        rt(self.min.x, self.min.y, self.max.x, self.max.y)
    }

    pub fn contains(&self, p: Point<T>) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Reports whether every point of `self` is also in `other`.
    /// The empty rectangle is in everything.
    pub fn is_in(&self, other: &Self) -> bool {
        if self.is_empty() {
            return true;
        }
        other.min.x <= self.min.x
            && self.max.x <= other.max.x
            && other.min.y <= self.min.y
            && self.max.y <= other.max.y
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Smallest rectangle covering both. An empty operand is ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Largest rectangle inside both, or [`Rect::zero`] when they are disjoint.
    pub fn intersect(self, other: Self) -> Self {
        let r = Self::new(self.min.max(other.min), self.max.min(other.max));
        if r.is_empty() {
            Self::zero()
        } else {
            r
        }
    }

    pub fn translate(self, d: Point<T>) -> Self {
        Self::new(self.min + d, self.max + d)
    }

    /// Shrinks each side by the given amount. An axis that cannot hold its
    /// padding collapses to a zero-width line at its midpoint.
    pub fn pad(self, top: T, bottom: T, left: T, right: T) -> Self {
        let mut r = self;
        if r.dx() < left + right {
            r.min.x = (r.min.x + r.max.x) / two();
            r.max.x = r.min.x;
        } else {
            r.min.x = r.min.x + left;
            r.max.x = r.max.x - right;
        }
        if r.dy() < top + bottom {
            r.min.y = (r.min.y + r.max.y) / two();
            r.max.y = r.min.y;
        } else {
            r.min.y = r.min.y + top;
            r.max.y = r.max.y - bottom;
        }
        r
    }

    /// Shrinks every side by `n`. Negative `n` grows the rectangle.
    pub fn inset(self, n: T) -> Self {
        self.pad(n, n, n, n)
    }

    pub fn center(&self) -> Point<T> {
        Point::new(
            self.min.x + self.dx() / two(),
            self.min.y + self.dy() / two(),
        )
    }

    /// Same size, recentered on `bounds`. The result may overhang `bounds`.
    pub fn align(self, bounds: Self) -> Self {
        let origin = Point::new(
            bounds.min.x + (bounds.dx() - self.dx()) / two(),
            bounds.min.y + (bounds.dy() - self.dy()) / two(),
        );
        Self::from_origin_size(origin, self.size())
    }

    /// Translates the rectangle by the smallest amount that puts it fully
    /// inside `bounds`. Returns an empty rectangle if it is too big to fit.
    pub fn closest_in(self, bounds: Self) -> Self {
        if self.is_empty() || self.dx() > bounds.dx() || self.dy() > bounds.dy() {
            return Self::zero();
        }
        let shift = |lo: T, hi: T, blo: T, bhi: T| {
            if lo < blo {
                blo - lo
            } else if hi > bhi {
                bhi - hi
            } else {
                T::zero()
            }
        };
        self.translate(Point::new(
            shift(self.min.x, self.max.x, bounds.min.x, bounds.max.x),
            shift(self.min.y, self.max.y, bounds.min.y, bounds.max.y),
        ))
    }

    /// Largest rectangle with the `aspect.x : aspect.y` ratio that fits in
    /// `self`, centered on it.
    pub fn with_aspect(self, aspect: Point<T>) -> Self {
        if self.is_empty() || aspect.x <= T::zero() || aspect.y <= T::zero() {
            return Self::zero();
        }
        let mut size = Point::new(self.dx(), self.dx() * aspect.y / aspect.x);
        if size.y > self.dy() {
            size = Point::new(self.dy() * aspect.x / aspect.y, self.dy());
        }
        Self::from_size(size).align(self)
    }

    /// Scales `self` to the largest size that keeps its aspect ratio and
    /// fits in `bounds`, centered on `bounds`.
    pub fn fit_to(self, bounds: Self) -> Self {
        bounds.with_aspect(self.size())
    }
}

impl<T: Scalar> PartialEq for Rect<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl<T: Scalar + Eq> Eq for Rect<T> {}

impl<T: Scalar> Default for Rect<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Scalar> Add<Point<T>> for Rect<T> {
    type Output = Self;

    fn add(self, d: Point<T>) -> Self {
        self.translate(d)
    }
}

impl<T: Scalar> Sub<Point<T>> for Rect<T> {
    type Output = Self;

    fn sub(self, d: Point<T>) -> Self {
        self.translate(-d)
    }
}

impl<T: fmt::Display> fmt::Display for Rect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

bitflags! {
    /// A set of rectangle edges, used for alignment and resize grabs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Edges: u8 {
        const TOP = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
    }
}


#[cfg(test)]
mod property_tests;
