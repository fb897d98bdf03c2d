//! # Planar Slicer
//!
//! This library provides the core of a 3D-printing slicer: it reads an
//! ASCII STL mesh, places and optionally rotates it relative to a build
//! volume, slices it into planar layers, reconstructs closed 2D contours
//! per layer, generates orthogonal-grid infill, and emits a
//! time-annotated print-head path together with optional per-layer SVG
//! previews.
//!
//! ## Architecture
//!
//! - **core**: mesh loading, placement, orientation, slicing, contour
//!   reconstruction, and infill generation
//! - **path**: print-head path assembly and optional SVG preview output
//! - **config**: build volume and slice settings, loaded from TOML
//! - **utils**: shared geometry and math primitives
//!
//! ## Slicing Workflow
//!
//! 1. Load the ASCII STL model file
//! 2. Load build-volume/slice settings
//! 3. Place (center, scale-to-fit, seat) the mesh on the build plate
//! 4. Slice at each Z-schedule height into edge segments
//! 5. Stitch edges into contours
//! 6. Generate X- and Y-axis orthogonal infill
//! 7. Emit the print-head path and run the cumulative-timing pass
//! 8. Optionally render a per-layer SVG preview
//!
//! ## Usage Example
//!
//! ```rust
//! use planar_slicer::{Slicer, PrinterSettings};
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = PrinterSettings::default();
//! let slicer = Slicer::new(settings);
//! let result = slicer.slice_file("model.stl", "outputs")?;
//! println!("Sliced {} layers in {:.2}s", result.layer_count, result.elapsed_time.as_secs_f64());
//! # Ok(())
//! # }
//! ```

// External crate imports - Standard library
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

// External crate imports - Third party
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// Public module declarations
pub mod config;
pub mod core;
pub mod path;
pub mod utils;

pub use config::{BuildVolume, PrinterSettings, SliceSettings};
pub use core::{Contour, InfillLine, SliceEdge, StlLoader};
pub use path::{PathRecord, PathWriter};
pub use utils::geometry::{Mesh, Point2D, Triangle, Vertex};

// Shared Type Definitions

/// Result of a slicing operation with statistics and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceResult {
    pub layer_count: u32,
    pub estimated_time: Duration,
    pub elapsed_time: Duration,
    pub warnings: Vec<String>,
    pub output_path: PathBuf,
    pub bounding_box: (f64, f64, f64, f64, f64, f64),
}

/// Progress callback for monitoring slicing operations.
pub type ProgressCallback = Arc<dyn Fn(SliceProgress) + Send + Sync>;

/// Progress information during slicing.
#[derive(Debug, Clone)]
pub struct SliceProgress {
    pub phase: SlicePhase,
    pub current_layer: Option<u32>,
    pub total_layers: Option<u32>,
    pub message: String,
}

/// Phases of the slicing process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicePhase {
    LoadingModel,
    Placing,
    Slicing,
    WritingPath,
}

impl SlicePhase {
    pub fn description(&self) -> &str {
        match self {
            SlicePhase::LoadingModel => "Loading STL model",
            SlicePhase::Placing => "Placing mesh on build plate",
            SlicePhase::Slicing => "Slicing layers",
            SlicePhase::WritingPath => "Writing print-head path",
        }
    }
}

/// Configuration specific to the slicer runtime (beyond build/slice settings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicerConfig {
    /// Number of worker threads for per-slice parallelism.
    pub worker_threads: usize,

    /// Enable rayon-based parallel per-slice computation. Slices have no
    /// cross-slice dependency; results are collected in Z-schedule order
    /// regardless of completion order, so output is identical to the
    /// sequential path.
    pub parallel_slicing: bool,

    /// Write a per-layer SVG preview alongside the path output.
    pub write_svg: bool,

    /// Optional rigid rotation applied to the placed mesh before slicing,
    /// as (axis, quarter turns). The mesh is re-placed (re-centered,
    /// re-fit, re-seated) after rotation, since rotation changes the
    /// bounding extents.
    pub rotation: Option<(core::orient::Axis, i32)>,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            parallel_slicing: true,
            write_svg: false,
            rotation: None,
        }
    }
}

/// Trait for loading 3D model files.
pub trait ModelLoader: Send + Sync {
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Mesh>;
}

// Error Type Definitions

/// Error types specific to slicing operations, matching the error-kind
/// table of the external specification.
#[derive(Debug, thiserror::Error)]
pub enum SlicerError {
    #[error("input parse error: {0}")]
    InputParse(String),

    #[error("mesh is empty")]
    EmptyMesh,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

// Slicer Orchestrator

/// Coordinates the complete slicing pipeline.
pub struct Slicer {
    settings: PrinterSettings,
    slicer_config: SlicerConfig,
    progress_callback: Option<ProgressCallback>,
}

impl Slicer {
    /// Creates a new slicer with the given build/slice settings and default
    /// runtime configuration.
    pub fn new(settings: PrinterSettings) -> Self {
        Self { settings, slicer_config: SlicerConfig::default(), progress_callback: None }
    }

    /// Creates a slicer with custom runtime configuration.
    pub fn with_config(settings: PrinterSettings, slicer_config: SlicerConfig) -> Self {
        Self { settings, slicer_config, progress_callback: None }
    }

    /// Sets a progress callback for monitoring.
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    /// Slices a model file and writes `path.csv` (plus optional per-layer
    /// SVGs) into `output_dir`.
    pub fn slice_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_path: P, output_dir: Q) -> Result<SliceResult> {
        let start = Instant::now();
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
        clear_dir(output_dir)
            .with_context(|| format!("clearing output directory {}", output_dir.display()))?;

        self.report_progress(SlicePhase::LoadingModel, None, None, "loading model");
        let loader = StlLoader::new();
        let mesh: Mesh = loader.load(input_path.as_ref())?;
        info!("loaded {} triangles from {}", mesh.triangles.len(), input_path.as_ref().display());

        let mut warnings = Vec::new();
        let (slice_settings, coercion_warnings) = self.settings.slice.normalized();
        warnings.extend(coercion_warnings);

        self.report_progress(SlicePhase::Placing, None, None, "placing mesh on build plate");
        let placed = self.place_and_orient(&mesh);
        let bounding_box = placed
            .bounds()
            .map(|(min, max)| (min.x, min.y, min.z, max.x, max.y, max.z))
            .unwrap_or((0.0, 0.0, 0.0, 0.0, 0.0, 0.0));

        let schedule = core::slicer::z_schedule(self.settings.build_volume.y_dim, slice_settings.layer_height);
        let total_layers = schedule.len() as u32;

        self.report_progress(SlicePhase::Slicing, Some(0), Some(total_layers), "slicing layers");
        // Each Z-schedule entry slices independently; `collect` on an
        // indexed parallel iterator preserves schedule order regardless of
        // which slice finishes first, so output matches the sequential path.
        let layers: Vec<LayerOutput> = if self.slicer_config.parallel_slicing {
            use rayon::prelude::*;
            schedule
                .par_iter()
                .map(|&z| process_layer(&placed, z, slice_settings.infill_spacing))
                .collect()
        } else {
            schedule
                .iter()
                .map(|&z| process_layer(&placed, z, slice_settings.infill_spacing))
                .collect()
        };

        let mut writer = PathWriter::new();
        for layer in &layers {
            writer.write_layer(&layer.contours, &layer.fill_x, &layer.fill_y, layer.z);
            if self.slicer_config.write_svg {
                let y_max = bounding_box.4;
                if let Err(e) =
                    path::svg::write_layer_svg(output_dir, layer.z, &layer.contours, &layer.fill_x, &layer.fill_y, y_max)
                {
                    warn!("failed to write SVG for layer at z={:.4}: {e:#}", layer.z);
                }
            }
            for contour in &layer.contours {
                if !contour.is_closed() {
                    warnings.push(format!("layer z={:.4}: contour {} is open", layer.z, contour.index));
                }
            }
        }

        self.report_progress(SlicePhase::WritingPath, None, None, "writing path.csv");
        let records = writer.finalize_timing(slice_settings.head_speed);
        write_path_csv(output_dir, &records)?;

        let estimated_time = records
            .last()
            .map(|r| Duration::from_secs_f64(r.t.max(0.0)))
            .unwrap_or_default();

        Ok(SliceResult {
            layer_count: total_layers,
            estimated_time,
            elapsed_time: start.elapsed(),
            warnings,
            output_path: output_dir.join("path.csv"),
            bounding_box,
        })
    }

    /// Slices an already-loaded mesh, returning the timed path records
    /// without touching the filesystem. Useful for programmatic/embedded use.
    pub fn slice_mesh(&self, mesh: &Mesh) -> Result<Vec<PathRecord>> {
        if mesh.is_empty() {
            return Err(SlicerError::EmptyMesh.into());
        }
        let (slice_settings, _) = self.settings.slice.normalized();
        let placed = self.place_and_orient(mesh);
        let schedule = core::slicer::z_schedule(self.settings.build_volume.y_dim, slice_settings.layer_height);

        let mut writer = PathWriter::new();
        for z in schedule {
            let layer = process_layer(&placed, z, slice_settings.infill_spacing);
            writer.write_layer(&layer.contours, &layer.fill_x, &layer.fill_y, layer.z);
        }
        Ok(writer.finalize_timing(slice_settings.head_speed))
    }

    /// Checks that the mesh is non-empty and loads without error; does not
    /// produce output.
    pub fn validate_model(&self, mesh: &Mesh) -> Result<()> {
        core::mesh_loader::validate_mesh(mesh)
    }

    /// Places the mesh on the build plate, then applies the optional rigid
    /// rotation and re-places afterward since rotation changes the bounding
    /// extents.
    fn place_and_orient(&self, mesh: &Mesh) -> Mesh {
        let placed = core::placer::place(mesh, &self.settings.build_volume);
        match self.slicer_config.rotation {
            Some((axis, quarter_turns)) => {
                let rotated = core::orient::rotate(&placed, axis, quarter_turns);
                core::placer::place(&rotated, &self.settings.build_volume)
            }
            None => placed,
        }
    }

    fn report_progress(&self, phase: SlicePhase, current_layer: Option<u32>, total_layers: Option<u32>, message: &str) {
        debug!("{}: {}", phase.description(), message);
        if let Some(callback) = &self.progress_callback {
            callback(SliceProgress { phase, current_layer, total_layers, message: message.to_string() });
        }
    }
}

struct LayerOutput {
    z: f64,
    contours: Vec<Contour>,
    fill_x: Vec<InfillLine>,
    fill_y: Vec<InfillLine>,
}

fn process_layer(mesh: &Mesh, z: f64, infill_spacing: f64) -> LayerOutput {
    let edges = core::slicer::slice_layer(mesh, z);
    let contours = core::contour::build_contours(&edges);
    let fill_x = core::infill::generate(&contours, core::infill::Axis::X, infill_spacing);
    let fill_y = core::infill::generate(&contours, core::infill::Axis::Y, infill_spacing);
    LayerOutput { z, contours, fill_x, fill_y }
}

/// Removes every existing entry in `dir`, matching the original tool's
/// clear-before-write behavior: output is determined solely by the mesh,
/// orientation, and settings, not by what a previous run left behind.
fn clear_dir(dir: &Path) -> std::io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let result = if entry.file_type()?.is_dir() { std::fs::remove_dir_all(&path) } else { std::fs::remove_file(&path) };
        match result {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn write_path_csv(output_dir: &Path, records: &[PathRecord]) -> Result<()> {
    use std::fmt::Write as _;
    let mut out = String::new();
    for r in records {
        let _ = writeln!(out, "{} {} {} {} {}", r.t, r.x, r.y, r.z, r.extrude as u8);
    }
    let path = output_dir.join("path.csv");
    std::fs::write(&path, out).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_mesh() -> Mesh {
        let v = Vertex::new;
        let n = v(0.0, 0.0, 1.0);
        Mesh::new(vec![
            Triangle::new([v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0)], n),
            Triangle::new([v(0.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)], n),
            Triangle::new([v(0.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 0.0, 1.0)], n),
            Triangle::new([v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 1.0)], n),
            Triangle::new([v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0)], n),
            Triangle::new([v(0.0, 0.0, 0.0), v(0.0, 1.0, 1.0), v(0.0, 0.0, 1.0)], n),
            Triangle::new([v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0)], n),
            Triangle::new([v(1.0, 0.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0)], n),
            Triangle::new([v(0.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(1.0, 0.0, 0.0)], n),
            Triangle::new([v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(1.0, 0.0, 1.0)], n),
            Triangle::new([v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0)], n),
            Triangle::new([v(0.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)], n),
        ])
    }

    #[test]
    fn slice_mesh_end_to_end_produces_monotonic_timed_path() {
        let mesh = unit_cube_mesh();
        let mut settings = PrinterSettings::default();
        settings.build_volume = BuildVolume::new(50.0, 50.0, 50.0);
        settings.slice.layer_height = 10.0;
        settings.slice.infill_spacing = 10.0;
        let slicer = Slicer::new(settings);
        let records = slicer.slice_mesh(&mesh).unwrap();
        assert!(!records.is_empty());
        assert_eq!(records[0].t, 0.0);
        for pair in records.windows(2) {
            assert!(pair[1].t >= pair[0].t);
        }
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mesh = Mesh::default();
        let slicer = Slicer::new(PrinterSettings::default());
        assert!(slicer.slice_mesh(&mesh).is_err());
    }

    #[test]
    fn clear_dir_removes_stale_entries_but_not_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("3.000.svg"), "stale").unwrap();
        std::fs::write(dir.path().join("path.csv"), "stale").unwrap();
        clear_dir(dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn clear_dir_tolerates_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(clear_dir(&missing).is_ok());
    }
}
