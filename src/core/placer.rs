//! # Placer
//!
//! Centers, uniformly scales, and seats a loaded mesh onto the build plate
//! prior to slicing. Grounded on the original tool's `orient.to_origin` /
//! `fit_bed` centering-and-scaling pass, but following the distilled
//! specification's explicit full-extent scale formula rather than the
//! source's post-centering half-extent convention (see DESIGN.md).

use crate::config::BuildVolume;
use crate::utils::geometry::{Mesh, Triangle, Vertex};

/// Centers the mesh at the origin, then uniformly scales it to fit within
/// `volume`, then seats it on the build plate.
pub fn place(mesh: &Mesh, volume: &BuildVolume) -> Mesh {
    let centered = center(mesh);
    let scale = fit_scale(&centered, volume);
    let scaled = scale_mesh(&centered, scale);
    seat(&scaled, volume)
}

fn center(mesh: &Mesh) -> Mesh {
    let Some((min, max)) = mesh.bounds() else {
        return mesh.clone();
    };
    let dx = -0.5 * (min.x + max.x);
    let dy = -0.5 * (min.y + max.y);
    let dz = -0.5 * (min.z + max.z);
    translate(mesh, dx, dy, dz)
}

fn fit_scale(mesh: &Mesh, volume: &BuildVolume) -> f64 {
    let Some((min, max)) = mesh.bounds() else {
        return 1.0;
    };
    let extent_x = max.x - min.x;
    let extent_y = max.y - min.y;
    let extent_z = max.z - min.z;
    let sx = if extent_x > 0.0 { volume.x_dim / extent_x } else { f64::INFINITY };
    let sy = if extent_y > 0.0 { volume.y_dim / extent_y } else { f64::INFINITY };
    let sz = if extent_z > 0.0 { volume.z_dim / extent_z } else { f64::INFINITY };
    sx.min(sy).min(sz)
}

fn seat(mesh: &Mesh, volume: &BuildVolume) -> Mesh {
    let Some((_, max)) = mesh.bounds() else {
        return mesh.clone();
    };
    translate(mesh, volume.x_dim / 2.0, max.y, volume.z_dim / 2.0)
}

pub fn scale_mesh(mesh: &Mesh, s: f64) -> Mesh {
    let triangles = mesh
        .triangles
        .iter()
        .map(|t| Triangle::new(t.vertices.map(|v| v.scale(s)), t.normal))
        .collect();
    Mesh::new(triangles)
}

pub fn translate(mesh: &Mesh, dx: f64, dy: f64, dz: f64) -> Mesh {
    let triangles = mesh
        .triangles
        .iter()
        .map(|t| Triangle::new(t.vertices.map(|v| v.translate(dx, dy, dz)), t.normal))
        .collect();
    Mesh::new(triangles)
}
