//! # Contour Builder
//!
//! Stitches an unordered list of `SliceEdge`s from one layer into one or
//! more connected polylines. Grounded on the original tool's
//! `slice.build_contours`, including its exact scan-budget formula
//! (`2 * original_edge_count`, not the shrinking remainder), its
//! unconditional per-pass increment of the scan counter (so the value
//! right after a match is 2, not 1), and its deliberate choice to emit
//! an unclosed contour rather than discard it when the budget is
//! exhausted.

use tracing::warn;

use crate::core::slicer::{SliceEdge, JOIN_TOLERANCE};
use crate::utils::geometry::Point2D;

/// One reconstructed contour: an ordered polyline plus its discovery index.
#[derive(Debug, Clone)]
pub struct Contour {
    pub index: u32,
    pub points: Vec<(Point2D, Point2D)>,
}

impl Contour {
    /// True if the contour's tail has rejoined its own head within tolerance.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some((head, _)), Some((_, tail))) => head.close_to(tail, JOIN_TOLERANCE),
            _ => false,
        }
    }
}

/// Builds contours from an unordered edge list for a single layer.
pub fn build_contours(edges: &[SliceEdge]) -> Vec<Contour> {
    let total_edges = edges.len();
    if total_edges == 0 {
        return Vec::new();
    }

    let mut remaining: Vec<SliceEdge> = edges.to_vec();
    let mut contours: Vec<Contour> = Vec::new();
    let mut contour_num: u32 = 1;
    let mut tail = Point2D::new(0.0, 0.0);
    let mut loop_cnt: u32 = 1;

    // Seed the first contour.
    let seed = remaining.remove(0);
    tail = seed.p2;
    contours.push(Contour { index: contour_num, points: vec![(seed.p1, seed.p2)] });

    while !remaining.is_empty() {
        for j in 0..remaining.len() {
            let candidate = remaining[j];
            if candidate.p1.close_to(&tail, JOIN_TOLERANCE) {
                tail = candidate.p2;
                contours.last_mut().unwrap().points.push((candidate.p1, candidate.p2));
                remaining.remove(j);
                loop_cnt = 1;
                break;
            }
            if candidate.p2.close_to(&tail, JOIN_TOLERANCE) {
                tail = candidate.p1;
                contours.last_mut().unwrap().points.push((candidate.p2, candidate.p1));
                remaining.remove(j);
                loop_cnt = 1;
                break;
            }
        }

        // Unconditional, matching the original: a match resets loop_cnt to 1
        // just above, but the scan always pays one more increment before the
        // budget check below, so the value right after a match is 2, not 1.
        loop_cnt += 1;

        let current = contours.last().unwrap();
        let closed = current
            .points
            .first()
            .map(|(head, _)| head.close_to(&tail, JOIN_TOLERANCE))
            .unwrap_or(false);

        if !remaining.is_empty() && (closed || loop_cnt > 2 * total_edges as u32) {
            if !closed {
                warn!(
                    "contour {} abandoned after exhausting scan budget; emitting as open",
                    contour_num
                );
            }
            contour_num += 1;
            let next = remaining.remove(0);
            tail = next.p2;
            contours.push(Contour { index: contour_num, points: vec![(next.p1, next.p2)] });
            loop_cnt = 1;
        }
    }

    if !contours.last().unwrap().is_closed() {
        warn!("final contour {} on this layer did not close", contour_num);
    }

    contours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(x1: f64, y1: f64, x2: f64, y2: f64) -> SliceEdge {
        SliceEdge { p1: Point2D::new(x1, y1), p2: Point2D::new(x2, y2) }
    }

    #[test]
    fn stitches_a_closed_square() {
        let edges = vec![
            edge(0.0, 0.0, 1.0, 0.0),
            edge(1.0, 0.0, 1.0, 1.0),
            edge(1.0, 1.0, 0.0, 1.0),
            edge(0.0, 1.0, 0.0, 0.0),
        ];
        let contours = build_contours(&edges);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 4);
        assert!(contours[0].is_closed());
    }

    #[test]
    fn stitches_edges_regardless_of_orientation() {
        // Second edge supplied reversed relative to travel direction.
        let edges = vec![
            edge(0.0, 0.0, 1.0, 0.0),
            edge(1.0, 1.0, 1.0, 0.0), // reversed: matches tail via p2
            edge(1.0, 1.0, 0.0, 1.0),
            edge(0.0, 1.0, 0.0, 0.0),
        ];
        let contours = build_contours(&edges);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].is_closed());
    }

    #[test]
    fn two_disjoint_squares_become_two_contours() {
        let edges = vec![
            edge(0.0, 0.0, 1.0, 0.0),
            edge(1.0, 0.0, 1.0, 1.0),
            edge(1.0, 1.0, 0.0, 1.0),
            edge(0.0, 1.0, 0.0, 0.0),
            edge(5.0, 5.0, 6.0, 5.0),
            edge(6.0, 5.0, 6.0, 6.0),
            edge(6.0, 6.0, 5.0, 6.0),
            edge(5.0, 6.0, 5.0, 5.0),
        ];
        let contours = build_contours(&edges);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].index, 1);
        assert_eq!(contours[1].index, 2);
        assert!(contours[0].is_closed());
        assert!(contours[1].is_closed());
    }

    #[test]
    fn an_open_chain_is_still_emitted() {
        let edges = vec![edge(0.0, 0.0, 1.0, 0.0), edge(1.0, 0.0, 1.0, 1.0)];
        let contours = build_contours(&edges);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 2);
        assert!(!contours[0].is_closed());
    }
}
