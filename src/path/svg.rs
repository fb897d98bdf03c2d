//! # Optional SVG Preview
//!
//! Writes one SVG file per slice, named by the slice's Z height in inches
//! (rounded to 3 decimals). Grounded on the original tool's
//! `path.svgcreate`: lines for contour edges plus lines for each infill
//! crossing pair, with Y flipped to account for SVG's downward-Y
//! convention.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::contour::Contour;
use crate::core::infill::{Axis, InfillLine};
use crate::path::writer::MM_PER_INCH;
use crate::utils::math::round_to;

/// Renders one layer's contours and infill to an SVG document.
pub fn render(contours: &[Contour], fill_x: &[InfillLine], fill_y: &[InfillLine], y_max: f64) -> String {
    let mut svg = String::new();
    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    svg.push('\n');
    svg.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#);
    svg.push('\n');

    for contour in contours {
        for (p1, p2) in &contour.points {
            let _ = write!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black"/>"#,
                p1.x,
                y_max - p1.y,
                p2.x,
                y_max - p2.y
            );
            svg.push('\n');
        }
    }

    for line in fill_x {
        for pair in line.crossings.chunks(2) {
            let [c0, c1] = pair else { continue };
            let _ = write!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black"/>"#,
                line.position,
                y_max - c0,
                line.position,
                y_max - c1
            );
            svg.push('\n');
        }
    }

    for line in fill_y {
        debug_assert_eq!(line.axis, Axis::Y);
        for pair in line.crossings.chunks(2) {
            let [c0, c1] = pair else { continue };
            let _ = write!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black"/>"#,
                c0,
                y_max - line.position,
                c1,
                y_max - line.position
            );
            svg.push('\n');
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes the rendered SVG for one slice into `dir`, named by the slice's Z
/// height in inches (rounded to 3 decimals), matching the original tool's
/// per-layer output naming.
pub fn write_layer_svg(
    dir: &Path,
    z_mm: f64,
    contours: &[Contour],
    fill_x: &[InfillLine],
    fill_y: &[InfillLine],
    y_max: f64,
) -> Result<()> {
    let z_in = round_to(z_mm / MM_PER_INCH, 3);
    let path = dir.join(format!("{}.svg", z_in));
    let contents = render(contours, fill_x, fill_y, y_max);
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))
}
