//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed through the card pipeline by value
//! - exported to JSON/CSV
//! - reused by the CLI for argument parsing (`ValueEnum`)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One recorded sample of a pump stroke.
///
/// `angle` is the crank position in whole degrees; one stroke cycle runs
/// 0..360 and wraps back to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub angle: i32,
    pub displacement: f64,
    pub load: f64,
}

impl RawSample {
    pub fn new(angle: i32, displacement: f64, load: f64) -> Self {
        Self {
            angle,
            displacement,
            load,
        }
    }

    /// Position on the card: x = displacement, y = load.
    pub fn point(&self) -> Point {
        Point::new(self.displacement, self.load)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Same point with the axes swapped.
    pub fn transposed(&self) -> Point {
        Point::new(self.y, self.x)
    }
}

/// Least-squares line `y = slope * x + intercept`.
///
/// `fit_error` is the mean squared residual over the fitted points. It is not
/// normalized, so thresholds on it only make sense in the [0, 1] card space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedLine {
    pub slope: f64,
    pub intercept: f64,
    pub fit_error: f64,
}

/// Side of the card loop a boundary segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
        }
    }

    /// Single-character marker used by the ASCII plot.
    pub fn marker(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Top => 'T',
            Side::Right => 'R',
            Side::Bottom => 'B',
        }
    }
}

/// Diagnosis label for a dynamometer card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardShape {
    FullPump,
    TubingMovement,
    FluidPound,
    GasInterference,
    FlowingWell,
    PumpHitting,
    BentBarrel,
    WornPlunger,
    WornStanding,
    WornOrSplitBarrel,
    FluidFriction,
    DragFriction,
    Other,
}

impl CardShape {
    pub fn display_name(self) -> &'static str {
        match self {
            CardShape::FullPump => "full pump",
            CardShape::TubingMovement => "tubing movement",
            CardShape::FluidPound => "fluid pound",
            CardShape::GasInterference => "gas interference",
            CardShape::FlowingWell => "flowing well",
            CardShape::PumpHitting => "pump hitting",
            CardShape::BentBarrel => "bent barrel",
            CardShape::WornPlunger => "worn plunger",
            CardShape::WornStanding => "worn standing",
            CardShape::WornOrSplitBarrel => "worn or split barrel",
            CardShape::FluidFriction => "fluid friction",
            CardShape::DragFriction => "drag friction",
            CardShape::Other => "other",
        }
    }
}

impl std::fmt::Display for CardShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How one stroke cycle is cut out of a longer recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CycleMode {
    /// Between the first two samples with `angle == 0`.
    Angle,
    /// Between displacement minima (start/started thresholds on displacement).
    Displacement,
}

/// Archetypes the synthetic card generator can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CardTemplate {
    FullPump,
    TubingMovement,
    WornPlunger,
    WornOrSplitBarrel,
    FlowingWell,
}

impl CardTemplate {
    /// Shape the template is drawn to produce.
    pub fn expected_shape(self) -> CardShape {
        match self {
            CardTemplate::FullPump => CardShape::FullPump,
            CardTemplate::TubingMovement => CardShape::TubingMovement,
            CardTemplate::WornPlunger => CardShape::WornPlunger,
            CardTemplate::WornOrSplitBarrel => CardShape::WornOrSplitBarrel,
            CardTemplate::FlowingWell => CardShape::FlowingWell,
        }
    }
}

/// Metadata found in `#` comment lines of a sample file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardHeader {
    pub well_id: Option<String>,
    pub timestamp: Option<String>,
    pub device_serial: Option<String>,
    pub sensor_serial: Option<String>,
}

/// Machine-readable result of classifying one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub well_id: Option<String>,
    pub pump_status: CardShape,
    pub device_serial: Option<String>,
    pub sensor_serial: Option<String>,
    pub timestamp: Option<String>,
    pub file: String,
    pub peak_load: f64,
    pub generated_at: String,
}

/// Configuration of a single-file classification run.
///
/// This is derived from CLI flags (plus defaults and environment).
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub path: PathBuf,
    pub min_weight: f64,
    pub device_serial: Option<String>,
    pub timestamp: Option<String>,
    pub json: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
}

/// Configuration of a directory batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub dir: PathBuf,
    pub min_weight: f64,
    pub out_dir: Option<PathBuf>,
    pub report_prefix: String,
}

/// Configuration of the synthetic card generator.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub template: CardTemplate,
    pub samples_per_side: usize,
    pub cycles: usize,
    pub stroke_length: f64,
    pub min_load: f64,
    pub max_load: f64,
    /// Gaussian noise, as a fraction of the stroke length / load range.
    pub noise: f64,
    pub seed: u64,
    /// Peak-load threshold for the diagnosis; `None` means `min_load`.
    pub min_weight: Option<f64>,
    pub classify: bool,
    pub out: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            template: CardTemplate::FullPump,
            samples_per_side: 12,
            cycles: 2,
            stroke_length: 100.0,
            min_load: 4_000.0,
            max_load: 12_000.0,
            noise: 0.0,
            seed: 42,
            min_weight: None,
            classify: true,
            out: None,
        }
    }
}
