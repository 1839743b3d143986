// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::VecDeque;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use strict_num::ApproxEqUlps;

/// Coordinates within this ratio of each other are considered the same (or mirrored).
pub const EPSILON_RATIO: f64 = 0.0001;

/// An immutable 2D vector.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// Creates a new `Vector`.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Vector { x, y }
    }

    /// Returns the `(0, 0)` vector.
    #[inline]
    pub fn origin() -> Self {
        Vector::new(0.0, 0.0)
    }

    /// Creates a vector from a slice of exactly two numbers.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match *values {
            [x, y] => Some(Vector::new(x, y)),
            _ => None,
        }
    }

    /// Returns the dot product of two vectors.
    #[inline]
    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the vector length.
    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns a unit-length copy of the vector.
    ///
    /// Returns `None` for a zero-length vector, since it has no direction.
    pub fn norm(self) -> Option<Self> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Vector::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Returns the vector pointing in the opposite direction.
    #[inline]
    pub fn mirror(self) -> Self {
        Vector::new(-self.x, -self.y)
    }

    /// Checks that `self` and `other` mirror each other.
    ///
    /// See [`are_mirrors`].
    #[inline]
    pub fn is_mirror_of(self, other: Vector) -> bool {
        are_mirrors(self, other)
    }
}

impl Add for Vector {
    type Output = Vector;

    #[inline]
    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    #[inline]
    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Vector {
    type Output = Vector;

    #[inline]
    fn neg(self) -> Vector {
        self.mirror()
    }
}

impl From<(f64, f64)> for Vector {
    fn from(v: (f64, f64)) -> Self {
        Vector::new(v.0, v.1)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Vector({} {})", self.x, self.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Checks that `v1` and `v2` have the same length and opposite directions,
/// within [`EPSILON_RATIO`] of the longer one.
///
/// Only the horizontal components are compared for the direction test.
pub fn are_mirrors(v1: Vector, v2: Vector) -> bool {
    let len1 = v1.length();
    let len2 = v2.length();
    let max_len = len1.max(len2);
    if !(max_len > 0.0) {
        return false;
    }

    (len1 - len2).abs() / max_len < EPSILON_RATIO && (v1.x + v2.x).abs() / max_len < EPSILON_RATIO
}

/// The four sides of a [`Rect`].
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Sides {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// An immutable axis-aligned rectangle.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new `Rect` from values.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Returns an empty rect at the origin.
    #[inline]
    pub fn empty() -> Self {
        Rect::default()
    }

    /// Creates a rect from an `origin` and a `size` vector.
    #[inline]
    pub fn from_origin_size(origin: Vector, size: Vector) -> Self {
        Rect::new(origin.x, origin.y, size.x, size.y)
    }

    /// Creates a rect from exactly four numbers: `x y width height`.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match *values {
            [x, y, width, height] => Some(Rect::new(x, y, width, height)),
            _ => None,
        }
    }

    /// Creates a rect from its sides.
    #[inline]
    pub fn from_sides(s: Sides) -> Self {
        Rect::new(s.left, s.top, s.right - s.left, s.bottom - s.top)
    }

    /// Returns rect's sides.
    #[inline]
    pub fn sides(&self) -> Sides {
        Sides {
            left: self.left(),
            top: self.top(),
            right: self.right(),
            bottom: self.bottom(),
        }
    }

    /// Returns rect's left edge position.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Returns rect's top edge position.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Returns rect's right edge position.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns rect's bottom edge position.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns rect's center.
    #[inline]
    pub fn center(&self) -> Vector {
        Vector::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns a rect that covers both `self` and the point `v`.
    pub fn expand(&self, v: Vector) -> Rect {
        Rect::from_sides(Sides {
            left: self.left().min(v.x),
            top: self.top().min(v.y),
            right: self.right().max(v.x),
            bottom: self.bottom().max(v.y),
        })
    }

    /// Returns a rect that covers both rects.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_sides(Sides {
            left: self.left().min(other.left()),
            top: self.top().min(other.top()),
            right: self.right().max(other.right()),
            bottom: self.bottom().max(other.bottom()),
        })
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rect({} {} {} {})", self.x, self.y, self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An immutable 2D affine matrix.
///
/// Maps `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Matrix {
    /// Constructs a new matrix.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Matrix { a, b, c, d, tx, ty }
    }

    /// Constructs an identity matrix.
    #[inline]
    pub fn identity() -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Constructs a new translate matrix.
    #[inline]
    pub fn new_translate(x: f64, y: f64) -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Constructs a new scale matrix.
    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Constructs a new rotate matrix. The angle is in degrees.
    #[inline]
    pub fn new_rotate(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Matrix::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Constructs a new rotate matrix around the `(x, y)` pivot.
    #[inline]
    pub fn new_rotate_at(angle: f64, x: f64, y: f64) -> Self {
        Matrix::new_translate(x, y)
            .rotate(angle)
            .translate(-x, -y)
    }

    /// Constructs a new skew matrix along the X axis. The angle is in degrees.
    #[inline]
    pub fn new_skew_x(angle: f64) -> Self {
        Matrix::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    /// Constructs a new skew matrix along the Y axis. The angle is in degrees.
    #[inline]
    pub fn new_skew_y(angle: f64) -> Self {
        Matrix::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Returns `self * other`.
    ///
    /// The resulting matrix applies `other` first, then `self`.
    #[inline]
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Returns the matrix translated by `(x, y)`.
    #[inline]
    pub fn translate(&self, x: f64, y: f64) -> Matrix {
        self.multiply(&Matrix::new_translate(x, y))
    }

    /// Returns the matrix rotated by `angle` degrees.
    #[inline]
    pub fn rotate(&self, angle: f64) -> Matrix {
        self.multiply(&Matrix::new_rotate(angle))
    }

    /// Returns the matrix scaled by `sx` and `sy`.
    #[inline]
    pub fn scale(&self, sx: f64, sy: f64) -> Matrix {
        self.multiply(&Matrix::new_scale(sx, sy))
    }

    /// Returns the matrix scaled by `s` along both axes.
    #[inline]
    pub fn scale_uniform(&self, s: f64) -> Matrix {
        self.scale(s, s)
    }

    /// Returns the matrix skewed along the X axis by `angle` degrees.
    #[inline]
    pub fn skew_x(&self, angle: f64) -> Matrix {
        self.multiply(&Matrix::new_skew_x(angle))
    }

    /// Returns the matrix skewed along the Y axis by `angle` degrees.
    #[inline]
    pub fn skew_y(&self, angle: f64) -> Matrix {
        self.multiply(&Matrix::new_skew_y(angle))
    }

    /// Applies the matrix to a point.
    #[inline]
    pub fn apply(&self, v: Vector) -> Vector {
        Vector::new(
            self.a * v.x + self.c * v.y + self.tx,
            self.b * v.x + self.d * v.y + self.ty,
        )
    }

    /// Applies the matrix to a rect.
    ///
    /// Only the top-left and bottom-right corners are transformed and the
    /// result is the axis-aligned rect spanning them. This is exact for
    /// translate and scale matrices only; rotation and skew produce a loose
    /// bound.
    pub fn apply_rect(&self, r: Rect) -> Rect {
        let p1 = self.apply(Vector::new(r.left(), r.top()));
        let p2 = self.apply(Vector::new(r.right(), r.bottom()));
        Rect::from_sides(Sides {
            left: p1.x.min(p2.x),
            top: p1.y.min(p2.y),
            right: p1.x.max(p2.x),
            bottom: p1.y.max(p2.y),
        })
    }

    /// Returns the inverse matrix.
    ///
    /// Returns `None` when the matrix is not invertible.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.a * self.d - self.b * self.c;
        if det.approx_eq_ulps(&0.0, 4) || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Matrix {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
            tx: (self.c * self.ty - self.d * self.tx) * inv_det,
            ty: (self.b * self.tx - self.a * self.ty) * inv_det,
        })
    }

    /// Returns `true` if the matrix is an identity, aka `(1 0 0 1 0 0)`.
    pub fn is_identity(&self) -> bool {
        self.a.approx_eq_ulps(&1.0, 4)
            && self.b.approx_eq_ulps(&0.0, 4)
            && self.c.approx_eq_ulps(&0.0, 4)
            && self.d.approx_eq_ulps(&1.0, 4)
            && self.tx.approx_eq_ulps(&0.0, 4)
            && self.ty.approx_eq_ulps(&0.0, 4)
    }
}

impl Default for Matrix {
    #[inline]
    fn default() -> Matrix {
        Matrix::identity()
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
}

impl Step {
    fn apply(self, m: Matrix) -> Matrix {
        match self {
            Step::Translate(x, y) => m.translate(x, y),
            Step::Rotate(angle) => m.rotate(angle),
            Step::Scale(sx, sy) => m.scale(sx, sy),
        }
    }

    fn inverse(self) -> Step {
        match self {
            Step::Translate(x, y) => Step::Translate(-x, -y),
            Step::Rotate(angle) => Step::Rotate(-angle),
            Step::Scale(sx, sy) => Step::Scale(1.0 / sx, 1.0 / sy),
        }
    }
}

/// Accumulates matrix operations and their inverses in parallel.
///
/// Every forward step pushes its inverse onto the front of a second list,
/// so `build_inverse()` always undoes `build()`.
///
/// ```
/// use tilesvg_tree::{MatrixBuilder, Vector};
///
/// let builder = MatrixBuilder::new().translate(1.0, 2.0).rotate(30.0).scale_uniform(0.9);
/// let v = Vector::new(3.0, -4.0);
/// let back = builder.build_inverse().apply(builder.build().apply(v));
/// assert!((back.x - v.x).abs() < 1e-9 && (back.y - v.y).abs() < 1e-9);
/// ```
#[derive(Clone, Default, Debug)]
pub struct MatrixBuilder {
    forward: Vec<Step>,
    inverse: VecDeque<Step>,
}

impl MatrixBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        MatrixBuilder::default()
    }

    fn push(mut self, step: Step) -> Self {
        self.forward.push(step);
        self.inverse.push_front(step.inverse());
        self
    }

    /// Appends a translation.
    pub fn translate(self, x: f64, y: f64) -> Self {
        self.push(Step::Translate(x, y))
    }

    /// Appends a rotation in degrees.
    pub fn rotate(self, angle: f64) -> Self {
        self.push(Step::Rotate(angle))
    }

    /// Appends a scale.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.push(Step::Scale(sx, sy))
    }

    /// Appends a uniform scale.
    pub fn scale_uniform(self, s: f64) -> Self {
        self.scale(s, s)
    }

    /// Replays all steps in call order.
    pub fn build(&self) -> Matrix {
        self.forward.iter().fold(Matrix::identity(), |m, step| step.apply(m))
    }

    /// Replays the inverse of every step in reverse order.
    pub fn build_inverse(&self) -> Matrix {
        self.inverse.iter().fold(Matrix::identity(), |m, step| step.apply(m))
    }
}
