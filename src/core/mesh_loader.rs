//! # Mesh Loading Module
//!
//! Parses ASCII STL files into the crate's internal `Mesh` representation.
//!
//! ## Supported Formats
//!
//! Only ASCII STL is supported. Binary STL, OBJ, and 3MF are explicitly out
//! of scope — see the crate-level documentation for the full non-goal list.
//!
//! ## Design Philosophy
//!
//! The loader follows the `ModelLoader` trait so the orchestrator in
//! `lib.rs` does not need to know the concrete parser in use. The parser
//! itself is a small line-oriented state machine: each line is tokenized on
//! whitespace and dispatched on its first token, mirroring the structure of
//! the original tool's STL reader exactly (facet normal staged until the
//! matching `endloop`, vertices buffered three at a time).
//!
//! ## Usage Example
//!
//! ```rust
//! use planar_slicer::core::mesh_loader::StlLoader;
//! use planar_slicer::ModelLoader;
//!
//! # fn example() -> anyhow::Result<()> {
//! let loader = StlLoader::new();
//! let mesh = loader.load("model.stl")?;
//! println!("Loaded {} triangles", mesh.triangles.len());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::utils::geometry::{Mesh, Triangle, Vertex};
use crate::ModelLoader;

/// Mesh statistics computed after loading, used for logging and the
/// `validate` CLI subcommand.
#[derive(Debug, Clone)]
pub struct MeshStats {
    pub triangle_count: usize,
    pub degenerate_count: usize,
    pub surface_area: f64,
}

impl MeshStats {
    pub fn empty() -> Self {
        Self { triangle_count: 0, degenerate_count: 0, surface_area: 0.0 }
    }

    pub fn is_healthy(&self) -> bool {
        self.triangle_count > 0 && self.degenerate_count == 0
    }
}

/// Computes mesh statistics for validation and reporting.
pub fn compute_mesh_stats(mesh: &Mesh) -> MeshStats {
    let mut stats = MeshStats { triangle_count: mesh.triangles.len(), degenerate_count: 0, surface_area: 0.0 };

    for tri in &mesh.triangles {
        let area = triangle_area(&tri.vertices[0], &tri.vertices[1], &tri.vertices[2]);
        if area < 1e-9 {
            stats.degenerate_count += 1;
        } else {
            stats.surface_area += area;
        }
    }

    stats
}

/// Validates that a loaded mesh is usable for slicing.
pub fn validate_mesh(mesh: &Mesh) -> Result<()> {
    if mesh.is_empty() {
        bail!("mesh has no triangles");
    }

    let stats = compute_mesh_stats(mesh);
    if stats.degenerate_count > 0 {
        warn!("mesh contains {} degenerate (near-zero-area) triangles", stats.degenerate_count);
    }

    Ok(())
}

fn triangle_area(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> f64 {
    let e1 = (v1.x - v0.x, v1.y - v0.y, v1.z - v0.z);
    let e2 = (v2.x - v0.x, v2.y - v0.y, v2.z - v0.z);
    let cross = (
        e1.1 * e2.2 - e1.2 * e2.1,
        e1.2 * e2.0 - e1.0 * e2.2,
        e1.0 * e2.1 - e1.1 * e2.0,
    );
    (cross.0 * cross.0 + cross.1 * cross.1 + cross.2 * cross.2).sqrt() / 2.0
}

/// ASCII STL loader.
pub struct StlLoader;

impl StlLoader {
    pub fn new() -> Self {
        Self
    }

    fn parse(contents: &str) -> Result<Mesh> {
        let mut triangles = Vec::new();
        let mut vertex_buf: Vec<Vertex> = Vec::with_capacity(3);
        let mut normal = Vertex::new(0.0, 0.0, 0.0);

        for (line_no, line) in contents.lines().enumerate() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&tag) = parts.first() else { continue };

            match tag {
                "solid" | "endfacet" | "endsolid" => {}
                "outer" => {}
                "facet" => {
                    if parts.len() < 5 {
                        bail!("line {}: malformed facet normal line: {:?}", line_no + 1, line);
                    }
                    normal = parse_vertex(&parts[2..5], line_no)?;
                }
                "vertex" => {
                    if parts.len() < 4 {
                        bail!("line {}: malformed vertex line: {:?}", line_no + 1, line);
                    }
                    vertex_buf.push(parse_vertex(&parts[1..4], line_no)?);
                }
                "endloop" => {
                    if vertex_buf.len() != 3 {
                        bail!(
                            "line {}: facet loop has {} vertices, expected exactly 3",
                            line_no + 1,
                            vertex_buf.len()
                        );
                    }
                    let verts = [vertex_buf[0], vertex_buf[1], vertex_buf[2]];
                    triangles.push(Triangle::new(verts, normal));
                    vertex_buf.clear();
                }
                _ => {
                    // Unknown tokens are tolerated (matches the original
                    // tool's tolerant line dispatch), but logged for
                    // visibility in case the file is not well-formed ASCII STL.
                    debug!("line {}: ignoring unrecognized token {:?}", line_no + 1, tag);
                }
            }
        }

        if !vertex_buf.is_empty() {
            bail!("file ended mid-facet with {} buffered vertices", vertex_buf.len());
        }

        Ok(Mesh::new(triangles))
    }
}

fn parse_vertex(tokens: &[&str], line_no: usize) -> Result<Vertex> {
    let x: f64 = tokens[0]
        .parse()
        .with_context(|| format!("line {}: invalid x coordinate {:?}", line_no + 1, tokens[0]))?;
    let y: f64 = tokens[1]
        .parse()
        .with_context(|| format!("line {}: invalid y coordinate {:?}", line_no + 1, tokens[1]))?;
    let z: f64 = tokens[2]
        .parse()
        .with_context(|| format!("line {}: invalid z coordinate {:?}", line_no + 1, tokens[2]))?;
    let v = Vertex::new(x, y, z);
    if !v.is_finite() {
        bail!("line {}: non-finite coordinate in {:?}", line_no + 1, tokens);
    }
    Ok(v)
}

impl Default for StlLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader for StlLoader {
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Mesh> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading STL file {}", path.display()))?;
        let mesh = Self::parse(&contents)
            .with_context(|| format!("parsing STL file {}", path.display()))?;
        if mesh.is_empty() {
            bail!("{} produced an empty mesh (no facets)", path.display());
        }
        debug!("loaded {} triangles from {}", mesh.triangles.len(), path.display());
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_STL: &str = r#"solid cube
facet normal 0 0 -1
outer loop
vertex 0 0 0
vertex 0 1 0
vertex 1 1 0
endloop
endfacet
facet normal 0 0 -1
outer loop
vertex 0 0 0
vertex 1 1 0
vertex 1 0 0
endloop
endfacet
endsolid cube
"#;

    #[test]
    fn parses_two_facet_ascii_stl() {
        let mesh = StlLoader::parse(CUBE_STL).unwrap();
        assert_eq!(mesh.triangles.len(), 2);
        assert_eq!(mesh.triangles[0].normal, Vertex::new(0.0, 0.0, -1.0));
        assert_eq!(mesh.triangles[0].vertices[1], Vertex::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn rejects_loop_with_wrong_vertex_count() {
        let bad = CUBE_STL.replace("vertex 1 0 0\nendloop", "endloop");
        assert!(StlLoader::parse(&bad).is_err());
    }

    #[test]
    fn triangle_area_right_triangle() {
        let v0 = Vertex::new(0.0, 0.0, 0.0);
        let v1 = Vertex::new(1.0, 0.0, 0.0);
        let v2 = Vertex::new(0.0, 1.0, 0.0);
        assert!((triangle_area(&v0, &v1, &v2) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_file_has_no_triangles_and_fails_validation() {
        let mesh = StlLoader::parse("solid empty\nendsolid empty\n").unwrap();
        assert!(mesh.is_empty());
        assert!(validate_mesh(&mesh).is_err());
    }
}
