//! Analytic geometry in 3D tracker space.
//!
//! All coordinates are millimetres in the depth camera frame (x right,
//! y down, z away from the camera). The types are small `Copy` values backed
//! by `nalgebra` vectors; none of them hold state between frames.

use crate::{constants::GEOMETRY_EPSILON, Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A point in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate (grows downwards)
    pub y: f64,
    /// Z coordinate (grows away from the camera)
    pub z: f64,
}

impl Point3D {
    /// Create a point from its coordinates
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The camera origin
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Positional vector from the origin to this point
    #[must_use]
    pub fn to_vector(self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z)
    }

    /// Point reached by a positional vector
    #[must_use]
    pub fn from_vector(vector: Vector3D) -> Self {
        Self::new(vector.x(), vector.y(), vector.z())
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.coords() - other.coords()).norm()
    }

    /// Distance after projecting both points onto the horizontal (x/z) plane
    #[must_use]
    pub fn horizontal_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Squared distance to the camera origin
    #[must_use]
    pub fn squared_norm(&self) -> f64 {
        self.coords().norm_squared()
    }

    pub(crate) fn coords(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point3D({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// A direction or displacement in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3D {
    coords: Vector3<f64>,
}

impl Vector3D {
    /// Create a vector from its components
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            coords: Vector3::new(x, y, z),
        }
    }

    /// Vector pointing from `from` to `to`
    #[must_use]
    pub fn from_points(from: &Point3D, to: &Point3D) -> Self {
        to.to_vector() - from.to_vector()
    }

    /// X component
    #[must_use]
    pub fn x(&self) -> f64 {
        self.coords.x
    }

    /// Y component
    #[must_use]
    pub fn y(&self) -> f64 {
        self.coords.y
    }

    /// Z component
    #[must_use]
    pub fn z(&self) -> f64 {
        self.coords.z
    }

    /// Scale evenly in all directions
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            coords: self.coords * factor,
        }
    }

    /// Euclidean norm
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.coords.norm()
    }

    /// Whether every component is exactly zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coords == Vector3::zeros()
    }

    /// Dot product
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.coords.dot(&other.coords)
    }

    /// Cross product
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            coords: self.coords.cross(&other.coords),
        }
    }

    /// The same vector with its vertical component removed
    #[must_use]
    pub fn horizontal(&self) -> Self {
        Self::new(self.coords.x, 0.0, self.coords.z)
    }

    /// Angle in radians between this and another vector.
    ///
    /// Taken from the sine and cosine parts together, so parallel vectors
    /// give exactly 0; zero-length or non-finite input also yields 0.
    #[must_use]
    pub fn angle(&self, other: &Self) -> f64 {
        let angle = self.cross(other).magnitude().atan2(self.dot(other));
        if angle.is_finite() {
            angle
        } else {
            0.0
        }
    }

    /// Normalised absolute cosine between two vectors, `None` if one is zero
    fn abs_cosine(v1: &Self, v2: &Self) -> Option<f64> {
        let norms = v1.magnitude() * v2.magnitude();
        if norms == 0.0 {
            return None;
        }
        Some((v1.dot(v2) / norms).abs())
    }

    /// Whether two vectors are parallel or anti-parallel within `epsilon`
    #[must_use]
    pub fn check_parallel(v1: &Self, v2: &Self, epsilon: f64) -> bool {
        Self::abs_cosine(v1, v2).is_some_and(|c| c > 1.0 - epsilon)
    }

    /// Whether two vectors are orthogonal within `epsilon`
    #[must_use]
    pub fn check_orthogonal(v1: &Self, v2: &Self, epsilon: f64) -> bool {
        Self::abs_cosine(v1, v2).is_some_and(|c| c < epsilon)
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            coords: self.coords + rhs.coords,
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            coords: self.coords - rhs.coords,
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self { coords: -self.coords }
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3D({:.3}, {:.3}, {:.3})", self.x(), self.y(), self.z())
    }
}

/// A line `support + r * direction`; the direction is never zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    support: Vector3D,
    direction: Vector3D,
}

impl Line {
    /// Create a line from a support vector and a directional vector
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the direction is the zero vector
    pub fn new(support: Vector3D, direction: Vector3D) -> Result<Self> {
        if direction.is_zero() {
            return Err(Error::InvalidInput(
                "Directional vector of a line must not be zero".to_string(),
            ));
        }
        Ok(Self { support, direction })
    }

    /// Line through two points, directed from `from` to `to`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if both points coincide
    pub fn from_points(from: &Point3D, to: &Point3D) -> Result<Self> {
        Self::new(from.to_vector(), Vector3D::from_points(from, to))
    }

    /// Support vector
    #[must_use]
    pub const fn support(&self) -> Vector3D {
        self.support
    }

    /// Directional vector
    #[must_use]
    pub const fn direction(&self) -> Vector3D {
        self.direction
    }

    /// The point at scale 0, i.e. where the ray starts
    #[must_use]
    pub fn origin(&self) -> Point3D {
        Point3D::from_vector(self.support)
    }

    /// Point `support + r * direction`
    #[must_use]
    pub fn point_at(&self, r: f64) -> Point3D {
        Point3D::from_vector(self.support + self.direction.scale(r))
    }

    /// Whether `point` lies on the line, measured in units of the direction length
    #[must_use]
    pub fn check_point_on_line(&self, point: &Point3D, epsilon: f64) -> bool {
        let offset = point.to_vector() - self.support;
        let deviation = offset.cross(&self.direction).magnitude() / self.direction.dot(&self.direction);
        deviation < epsilon
    }

    /// Scale factor of the direction needed to reach `point`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the point is not on the line
    pub fn scale_value(&self, point: &Point3D, epsilon: f64) -> Result<f64> {
        if !self.check_point_on_line(point, epsilon) {
            return Err(Error::InvalidInput(format!("{point} is not situated on line")));
        }
        let offset = point.to_vector() - self.support;
        Ok(offset.dot(&self.direction) / self.direction.dot(&self.direction))
    }

    /// Whether `point` lies in the direction the line points
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the point is off the line or the scale is
    /// (near) zero, where no direction can be told
    pub fn check_point_scale_positive_direction(&self, point: &Point3D, epsilon: f64) -> Result<bool> {
        let r = self.scale_value(point, epsilon)?;
        if r.abs() < epsilon {
            return Err(Error::InvalidInput(
                "Scale factor is (near) zero, direction is undetermined".to_string(),
            ));
        }
        Ok(r > 0.0)
    }

    /// Shortest vector from `point` to the line
    ///
    /// # Errors
    ///
    /// Propagates `Parallel` from the plane intersection, which cannot occur
    /// for a valid line
    pub fn orthogonal_vector_to_point(&self, point: &Point3D) -> Result<Vector3D> {
        let plane = Plane3D::from_orthogonal_and_point(&self.direction, point);
        let (foot, _) = plane.intersect_line(self)?;
        Ok(Vector3D::from_points(point, &foot))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line(support: {}, direction: {})", self.support, self.direction)
    }
}

/// Plane `a*x + b*y + c*z = d`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    /// Coefficient of x
    pub a: f64,
    /// Coefficient of y
    pub b: f64,
    /// Coefficient of z
    pub c: f64,
    /// Right-hand side
    pub d: f64,
}

impl Plane3D {
    /// Plane from its implicit equation
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Plane through `support` spanned by two non-parallel directions
    ///
    /// # Errors
    ///
    /// Returns `Parallel` if the directions are parallel
    pub fn from_vectors(support: &Vector3D, dir1: &Vector3D, dir2: &Vector3D) -> Result<Self> {
        if Vector3D::check_parallel(dir1, dir2, GEOMETRY_EPSILON) {
            return Err(Error::Parallel(
                "Directional vectors of a plane must not be parallel".to_string(),
            ));
        }
        let normal = dir1.cross(dir2);
        if normal.is_zero() {
            return Err(Error::Parallel("Directional vectors span no plane".to_string()));
        }
        Ok(Self::new(normal.x(), normal.y(), normal.z(), normal.dot(support)))
    }

    /// Plane orthogonal to `normal` containing `point`
    #[must_use]
    pub fn from_orthogonal_and_point(normal: &Vector3D, point: &Point3D) -> Self {
        Self::new(normal.x(), normal.y(), normal.z(), normal.dot(&point.to_vector()))
    }

    /// Normal vector `(a, b, c)`
    #[must_use]
    pub fn normal(&self) -> Vector3D {
        Vector3D::new(self.a, self.b, self.c)
    }

    /// Same plane with a unit-length normal, so that the equation residual
    /// is the distance in millimetres
    #[must_use]
    pub fn normalized(&self) -> Self {
        let norm = self.normal().magnitude();
        if norm == 0.0 {
            return *self;
        }
        Self::new(self.a / norm, self.b / norm, self.c / norm, self.d / norm)
    }

    /// Whether the equation holds for `point` within `epsilon`
    #[must_use]
    pub fn contains_point(&self, point: &Point3D, epsilon: f64) -> bool {
        let value = self.c.mul_add(point.z, self.a.mul_add(point.x, self.b * point.y));
        (value - self.d).abs() < epsilon
    }

    /// Intersect the plane with a line.
    ///
    /// Returns the intersection and whether it lies behind the line origin
    /// (negative scale of the direction).
    ///
    /// # Errors
    ///
    /// Returns `Parallel` if the line runs parallel to the plane
    pub fn intersect_line(&self, line: &Line) -> Result<(Point3D, bool)> {
        let normal = self.normal();
        let direction = line.direction();
        if Vector3D::check_orthogonal(&normal, &direction, GEOMETRY_EPSILON) {
            return Err(Error::Parallel(
                "Plane and line are parallel, no intersection point exists".to_string(),
            ));
        }

        let numerator = self.d - normal.dot(&line.support());
        let denominator = normal.dot(&direction);
        let r = numerator / denominator;
        Ok((line.point_at(r), r < 0.0))
    }
}

impl fmt::Display for Plane3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane({} * x + {} * y + {} * z = {})", self.a, self.b, self.c, self.d)
    }
}

/// A sphere in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere3D {
    /// Centre point
    pub center: Point3D,
    /// Radius in millimetres
    pub radius: f64,
}

impl Sphere3D {
    /// Create a sphere
    #[must_use]
    pub const fn new(center: Point3D, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Intersect with a line: no point, one tangent point, or two points
    /// ordered along the line direction
    #[must_use]
    pub fn intersect_line(&self, line: &Line) -> Vec<Point3D> {
        let direction = line.direction();
        let offset = line.support() - self.center.to_vector();

        let a = direction.dot(&direction);
        let b = 2.0 * offset.dot(&direction);
        let c = self.radius.mul_add(-self.radius, offset.dot(&offset));

        let discriminant = b.mul_add(b, -4.0 * a * c);
        if !discriminant.is_finite() || discriminant < 0.0 {
            return Vec::new();
        }
        if discriminant == 0.0 {
            return vec![line.point_at(-b / (2.0 * a))];
        }

        let root = discriminant.sqrt();
        vec![
            line.point_at((-b - root) / (2.0 * a)),
            line.point_at((-b + root) / (2.0 * a)),
        ]
    }
}
