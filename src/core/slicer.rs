//! # Slicer
//!
//! Plane/triangle intersection: for a given Z height, computes the set of
//! edge segments where the mesh crosses that plane. Grounded on the
//! original tool's `slice.compute_points_on_z` and `slice.interpolation`,
//! including its exact axis remap (viewer X/Y/Z becomes print Z/X/Y) and
//! its Z-schedule nudge.

use tracing::debug;

use crate::core::orient::{self, Axis};
use crate::utils::geometry::{Mesh, Point2D, Vertex};
use crate::utils::math::round_to;

/// Matching-tolerance for discarding a degenerate (too-close) edge pair,
/// and for stitching edges into contours downstream. 0.005 mm = 5 microns.
pub const JOIN_TOLERANCE: f64 = 0.005;

/// Z-plane offset applied at every pass except the last, where it is
/// applied with the opposite sign. Keeps the slicing plane from landing
/// exactly on a vertex, which would otherwise make the straddle test
/// ambiguous.
pub const Z_NUDGE: f64 = 0.01;

/// A single segment where a triangle crosses the slicing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceEdge {
    pub p1: Point2D,
    pub p2: Point2D,
}

/// Computes the ordered sequence of Z heights to slice at, given the print
/// height and layer step. Produces `N + 2` planes for `N =
/// floor(print_height / step)`: a `+nudge` offset at every pass except the
/// last, which uses `-nudge`. This asymmetry (rather than a uniform nudge)
/// is preserved exactly from the original tool's loop, per the distilled
/// specification's explicit direction to keep this observed behavior.
pub fn z_schedule(print_height: f64, step: f64) -> Vec<f64> {
    let n = (print_height / step) as i64;
    (0..=n + 1)
        .map(|k| {
            let z = if k == n + 1 { k as f64 * step - Z_NUDGE } else { k as f64 * step + Z_NUDGE };
            round_to(z, 2)
        })
        .collect()
}

/// Flips the mesh 180 degrees about X (viewer Y-up to print Z-up) and
/// reinterprets each point's (x, y, z) as (z, x, y), matching the original
/// tool's axis remap before slicing.
fn to_print_frame(mesh: &Mesh) -> Vec<[Vertex; 3]> {
    let flipped = orient::rotate(mesh, Axis::X, 2);
    flipped
        .triangles
        .iter()
        .map(|t| t.vertices.map(|v| Vertex::new(v.z, v.x, v.y)))
        .collect()
}

fn interpolate(p1: Vertex, p2: Vertex, z: f64) -> Point2D {
    let t = (z - p1.x) / (p2.x - p1.x);
    Point2D::new(t * (p2.y - p1.y) + p1.y, t * (p2.z - p1.z) + p1.z)
}

/// Computes the edge list for one slicing plane at height `z`. The mesh
/// passed in must already be in print-frame order (see `to_print_frame`);
/// `slice_layer` below handles that transform once per call and is the
/// entry point callers should use.
fn edges_at_z(faces: &[[Vertex; 3]], z: f64) -> Vec<SliceEdge> {
    let mut edges = Vec::new();

    for face in faces {
        let mut pairs: Vec<Point2D> = Vec::with_capacity(2);

        let straddles = |a: Vertex, b: Vertex| (b.x < z && z < a.x) || (a.x < z && z < b.x);

        if straddles(face[0], face[1]) {
            pairs.push(interpolate(face[0], face[1], z));
        }
        if straddles(face[0], face[2]) {
            pairs.push(interpolate(face[0], face[2], z));
        }
        if straddles(face[1], face[2]) {
            pairs.push(interpolate(face[1], face[2], z));
        }

        if face[0].x == z {
            pairs.push(Point2D::new(face[0].y, face[0].z));
        } else if face[1].x == z {
            pairs.push(Point2D::new(face[1].y, face[1].z));
        } else if face[2].x == z {
            pairs.push(Point2D::new(face[2].y, face[2].z));
        }

        if pairs.len() == 2 {
            if !pairs[0].close_to(&pairs[1], JOIN_TOLERANCE) {
                edges.push(SliceEdge { p1: pairs[0], p2: pairs[1] });
            }
            // else: degenerate slice, silently dropped (DegenerateSlice, non-fatal)
        }
        // 0, 1, or 3 collected points contribute nothing.
    }

    edges
}

/// Slices `mesh` (already placed, in viewer coordinates) at height `z`.
pub fn slice_layer(mesh: &Mesh, z: f64) -> Vec<SliceEdge> {
    let faces = to_print_frame(mesh);
    let mut edges = edges_at_z(&faces, z);
    for edge in &mut edges {
        edge.p1 = Point2D::new(round_to(edge.p1.x, 5), round_to(edge.p1.y, 5));
        edge.p2 = Point2D::new(round_to(edge.p2.x, 5), round_to(edge.p2.y, 5));
    }
    debug!("z={:.4}: {} edges", z, edges.len());
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::Triangle;

    #[test]
    fn z_schedule_has_n_plus_2_entries_with_asymmetric_nudge() {
        let schedule = z_schedule(10.0, 2.0); // N = 5
        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule[0], 0.01);
        assert_eq!(schedule[5], 10.01);
        assert_eq!(schedule[6], 11.99);
    }

    #[test]
    fn single_triangle_exactly_on_plane_contributes_nothing() {
        // All three vertices at print-frame x == z (three exact matches
        // collapse to one via the if/else-if chain, never producing a pair).
        let v = |x: f64, y: f64, z: f64| Vertex::new(x, y, z);
        // Build so that after the 180-about-X flip and axis remap, the
        // triangle lies flat in the slicing plane at z=0.
        let mesh = Mesh::new(vec![Triangle::new(
            [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)],
            v(0.0, 0.0, 1.0),
        )]);
        let edges = slice_layer(&mesh, 0.0);
        assert!(edges.is_empty());
    }

    #[test]
    fn cube_mid_height_slice_produces_four_edges() {
        let v = |x: f64, y: f64, z: f64| Vertex::new(x, y, z);
        let n = v(0.0, 0.0, 1.0);
        // A unit cube spanning print-frame z in [-1, 1] after the axis
        // remap; built directly as two triangles per vertical face is
        // unnecessary for this check -- we only need edges crossing a
        // known Z. Use a simple vertical prism: 4 side faces as triangles
        // whose original-frame Z axis becomes the print-frame height.
        let mesh = Mesh::new(vec![
            Triangle::new([v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, -1.0, 1.0)], n),
            Triangle::new([v(-1.0, -1.0, -1.0), v(1.0, -1.0, 1.0), v(-1.0, -1.0, 1.0)], n),
            Triangle::new([v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0)], n),
            Triangle::new([v(1.0, -1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0)], n),
            Triangle::new([v(1.0, 1.0, -1.0), v(-1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0)], n),
            Triangle::new([v(1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0), v(1.0, 1.0, 1.0)], n),
            Triangle::new([v(-1.0, 1.0, -1.0), v(-1.0, -1.0, -1.0), v(-1.0, -1.0, 1.0)], n),
            Triangle::new([v(-1.0, 1.0, -1.0), v(-1.0, -1.0, 1.0), v(-1.0, 1.0, 1.0)], n),
        ]);
        // After a 180-about-X flip, original Z becomes -Z; the remap then
        // takes (x,y,z)->(z,x,y). The original Z extent [-1,1] becomes the
        // print-frame slicing axis, so z=0 passes through the mid-height
        // of every side face.
        let edges = slice_layer(&mesh, 0.0);
        assert_eq!(edges.len(), 8);
    }
}
