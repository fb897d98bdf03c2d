//! Core geometric primitives shared by every slicing stage.

use serde::{Deserialize, Serialize};

/// A point in the plane of a single slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both axes are within `tol` of each other, matching the
    /// original tool's "close enough to discard" test (an AND of per-axis
    /// differences, not a Euclidean distance).
    pub fn close_to(&self, other: &Point2D, tol: f64) -> bool {
        (self.x - other.x).abs() < tol && (self.y - other.y).abs() < tol
    }
}

/// A point in mesh space (double precision; slicing accumulates enough
/// intermediate rounding that single precision is not worth the savings).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn scale(&self, s: f64) -> Vertex {
        Vertex::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Vertex {
        Vertex::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// A single facet: three vertices in input winding order plus the normal
/// as read from the STL file. The normal is trusted, never recomputed.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub normal: Vertex,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], normal: Vertex) -> Self {
        Self { vertices, normal }
    }
}

/// An ordered collection of triangles, in input (file) order.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)` vertices.
    pub fn bounds(&self) -> Option<(Vertex, Vertex)> {
        let mut iter = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for v in iter {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        Some((min, max))
    }
}
