//! # Rigid Orientation Hook
//!
//! Applies a 90°-multiple rotation about X, Y, or Z to the mesh, grounded
//! on the original tool's `gtransform.rotation` matrices. Normals rotate
//! with the same matrix as vertices. Theta is restricted to multiples of
//! 90 degrees so cos/sin land on exactly {-1, 0, 1} and no floating error
//! accumulates from repeated rotations.

use serde::{Deserialize, Serialize};

use crate::utils::geometry::{Mesh, Triangle, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotates `mesh` by `quarter_turns * 90` degrees about `axis`.
/// `quarter_turns` is taken modulo 4; negative values rotate the other way.
pub fn rotate(mesh: &Mesh, axis: Axis, quarter_turns: i32) -> Mesh {
    let q = quarter_turns.rem_euclid(4);
    let (cos, sin) = match q {
        0 => (1.0, 0.0),
        1 => (0.0, 1.0),
        2 => (-1.0, 0.0),
        3 => (0.0, -1.0),
        _ => unreachable!(),
    };

    let rotate_vertex = |v: Vertex| -> Vertex {
        match axis {
            Axis::X => Vertex::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos),
            Axis::Y => Vertex::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos),
            Axis::Z => Vertex::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z),
        }
    };

    let triangles = mesh
        .triangles
        .iter()
        .map(|t| Triangle::new(t.vertices.map(rotate_vertex), rotate_vertex(t.normal)))
        .collect();
    Mesh::new(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ninety_degrees_about_z_maps_x_axis_to_y_axis() {
        let n = Vertex::new(1.0, 0.0, 0.0);
        let mesh = Mesh::new(vec![Triangle::new(
            [Vertex::new(1.0, 0.0, 0.0), Vertex::new(0.0, 0.0, 0.0), Vertex::new(0.0, 1.0, 0.0)],
            n,
        )]);
        let rotated = rotate(&mesh, Axis::Z, 1);
        let v0 = rotated.triangles[0].vertices[0];
        assert!((v0.x - 0.0).abs() < 1e-12);
        assert!((v0.y - 1.0).abs() < 1e-12);
        let normal = rotated.triangles[0].normal;
        assert!((normal.x - 0.0).abs() < 1e-12);
        assert!((normal.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn four_quarter_turns_is_identity() {
        let mesh = Mesh::new(vec![Triangle::new(
            [Vertex::new(1.0, 2.0, 3.0), Vertex::new(4.0, 5.0, 6.0), Vertex::new(7.0, 8.0, 9.0)],
            Vertex::new(0.0, 0.0, 1.0),
        )]);
        let rotated = rotate(&mesh, Axis::X, 4);
        assert_eq!(rotated.triangles[0].vertices[0], mesh.triangles[0].vertices[0]);
    }
}
