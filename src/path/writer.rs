//! # Path Writer
//!
//! Phase A emits travel/deposit `PathRecord`s per layer (contours, then
//! per-axis infill); Phase B runs once over the complete, assembled path to
//! fill in cumulative elapsed time. Grounded on the original tool's
//! `path.headpath` and `path.time_calc`.

use serde::{Deserialize, Serialize};

use crate::core::contour::Contour;
use crate::core::infill::{Axis, InfillLine};
use crate::utils::math::round_to;

pub const MM_PER_INCH: f64 = 25.4;

/// One point in the assembled print-head path. Coordinates are in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub extrude: bool,
    pub t: f64,
}

/// Accumulates `PathRecord`s across every layer of a print.
#[derive(Debug, Clone, Default)]
pub struct PathWriter {
    records: Vec<PathRecord>,
}

impl PathWriter {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn records(&self) -> &[PathRecord] {
        &self.records
    }

    fn push_mm(&mut self, x_mm: f64, y_mm: f64, z_mm: f64, extrude: bool) {
        self.records.push(PathRecord {
            x: round_to(x_mm / MM_PER_INCH, 4),
            y: round_to(y_mm / MM_PER_INCH, 4),
            z: round_to(z_mm / MM_PER_INCH, 4),
            extrude,
            t: 0.0,
        });
    }

    /// Phase A for one layer: appends contour travel/deposit moves followed
    /// by infill travel/deposit moves, all at height `z_mm`.
    pub fn write_layer(&mut self, contours: &[Contour], fill_x: &[InfillLine], fill_y: &[InfillLine], z_mm: f64) {
        self.write_contours(contours, z_mm);
        self.write_infill(fill_x, z_mm);
        self.write_infill(fill_y, z_mm);
    }

    fn write_contours(&mut self, contours: &[Contour], z_mm: f64) {
        for contour in contours {
            let Some((first_p1, _)) = contour.points.first() else { continue };
            self.push_mm(first_p1.x, first_p1.y, z_mm, false);
            for (p1, _) in contour.points.iter().skip(1) {
                self.push_mm(p1.x, p1.y, z_mm, true);
            }
            // Close the loop by revisiting the contour's start point, even
            // if it never actually closed within tolerance: an open
            // contour is written anyway, not discarded.
            self.push_mm(first_p1.x, first_p1.y, z_mm, true);
        }
    }

    fn write_infill(&mut self, lines: &[InfillLine], z_mm: f64) {
        for line in lines {
            for pair in line.crossings.chunks(2) {
                let [c0, c1] = pair else { continue };
                match line.axis {
                    Axis::X => {
                        self.push_mm(line.position, *c0, z_mm, false);
                        self.push_mm(line.position, *c1, z_mm, true);
                    }
                    Axis::Y => {
                        self.push_mm(*c0, line.position, z_mm, false);
                        self.push_mm(*c1, line.position, z_mm, true);
                    }
                }
            }
        }
    }

    /// Phase B: post-processes the complete path, filling in cumulative
    /// time based on 3D Euclidean distance between consecutive points and
    /// a constant head speed. The first record's time is always 0.
    pub fn finalize_timing(mut self, head_speed: f64) -> Vec<PathRecord> {
        let mut previous: Option<PathRecord> = None;
        for record in self.records.iter_mut() {
            let t = match previous {
                None => 0.0,
                Some(prev) => {
                    let dist = ((record.x - prev.x).powi(2)
                        + (record.y - prev.y).powi(2)
                        + (record.z - prev.z).powi(2))
                    .sqrt();
                    round_to(prev.t + dist / head_speed, 4)
                }
            };
            record.t = t;
            previous = Some(*record);
        }
        self.records
    }
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
    fn first_contour_point_is_a_travel_move() {
        let mut writer = PathWriter::new();
        writer.write_layer(&[square_contour()], &[], &[], 0.0);
        let records = writer.records();
        assert!(!records[0].extrude);
        assert!(records[1..].iter().all(|r| r.extrude));
    }

    #[test]
    fn infill_crossings_alternate_travel_then_deposit() {
        let line = InfillLine { axis: Axis::X, position: 5.0, crossings: vec![1.0, 9.0] };
        let mut writer = PathWriter::new();
        writer.write_layer(&[], &[line], &[], 0.0);
        let records = writer.records();
        assert_eq!(records.len(), 2);
        assert!(!records[0].extrude);
        assert!(records[1].extrude);
    }

    #[test]
    fn timing_starts_at_zero_and_is_monotonic() {
        let mut writer = PathWriter::new();
        writer.write_layer(&[square_contour()], &[], &[], 0.0);
        let timed = writer.finalize_timing(1.0);
        assert_eq!(timed[0].t, 0.0);
        for pair in timed.windows(2) {
            assert!(pair[1].t >= pair[0].t);
        }
    }
}
