//! # Infill Generator
//!
//! Orthogonal-grid scanline infill over a layer's contours. Grounded on the
//! original tool's `slice.infill`, run once per axis per layer.

use tracing::debug;

use crate::core::contour::Contour;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone)]
pub struct InfillLine {
    pub axis: Axis,
    pub position: f64,
    pub crossings: Vec<f64>,
}

/// Generates scanline infill for `axis` across all contour edges of a layer.
pub fn generate(contours: &[Contour], axis: Axis, spacing: f64) -> Vec<InfillLine> {
    let segments: Vec<(f64, f64, f64, f64)> = contours
        .iter()
        .flat_map(|c| c.points.iter())
        .map(|(p1, p2)| (p1.x, p1.y, p2.x, p2.y))
        .collect();

    if segments.is_empty() {
        return Vec::new();
    }

    let direct = match axis {
        Axis::X => 0,
        Axis::Y => 1,
    };

    let coord = |s: &(f64, f64, f64, f64), which: usize| -> f64 {
        match which {
            0 => s.0,
            1 => s.1,
            2 => s.2,
            _ => s.3,
        }
    };

    let min_pos = segments
        .iter()
        .flat_map(|s| [coord(s, direct), coord(s, direct + 2)])
        .fold(f64::INFINITY, f64::min);
    let max_pos = segments
        .iter()
        .flat_map(|s| [coord(s, direct), coord(s, direct + 2)])
        .fold(f64::NEG_INFINITY, f64::max);

    let passes = ((max_pos - min_pos) / spacing) as i64;

    let mut lines = Vec::new();
    for fill_pass in 0..=passes {
        let loc = min_pos + fill_pass as f64 * spacing;
        let mut pts: Vec<f64> = Vec::new();

        for seg in &segments {
            let a = coord(seg, direct);
            let b = coord(seg, direct + 2);
            if (a < loc && loc < b) || (b < loc && loc < a) {
                let (x1, y1, x2, y2) = *seg;
                let slope = (y2 - y1) / (x2 - x1);
                if direct == 0 {
                    pts.push(slope * (loc - x1) + y1);
                } else if slope.is_infinite() {
                    pts.push(coord(seg, direct + 1));
                } else {
                    pts.push((loc - y1) / slope + x1);
                }
            }
        }

        pts.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // Added rigor beyond the original tool: an odd crossing count means
        // the scan grazed a vertex rather than cleanly straddling an edge
        // pair. Drop the pass instead of emitting an unpaired travel move.
        if pts.len() % 2 != 0 {
            debug!("infill pass at {:.4} ({:?}) produced odd crossing count {}, dropping", loc, axis, pts.len());
            continue;
        }

        lines.push(InfillLine { axis, position: loc, crossings: pts });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::Point2D;

    fn square_contour() -> Contour {
        let p = Point2D::new;
        Contour {
            index: 1,
            points: vec![
                (p(0.0, 0.0), p(10.0, 0.0)),
                (p(10.0, 0.0), p(10.0, 10.0)),
                (p(10.0, 10.0), p(0.0, 10.0)),
                (p(0.0, 10.0), p(0.0, 0.0)),
            ],
        }
    }

    #[test]
    fn spacing_larger_than_extent_yields_single_pass() {
        let lines = generate(&[square_contour()], Axis::X, 20.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn x_axis_fill_crosses_top_and_bottom_edges_at_interior_pass() {
        let lines = generate(&[square_contour()], Axis::X, 5.0);
        // passes at x=0,5,10: the boundary passes land exactly on a corner
        // (strict straddle fails there), only the interior pass crosses.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].crossings.len(), 0);
        assert_eq!(lines[1].crossings.len(), 2);
        assert_eq!(lines[2].crossings.len(), 0);
    }

    #[test]
    fn y_axis_fill_crosses_left_and_right_edges_at_interior_pass() {
        let lines = generate(&[square_contour()], Axis::Y, 5.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].crossings.len(), 0);
        assert_eq!(lines[1].crossings.len(), 2);
        assert_eq!(lines[2].crossings.len(), 0);
    }

    #[test]
    fn empty_contour_list_produces_no_infill() {
        assert!(generate(&[], Axis::X, 1.0).is_empty());
    }
}
