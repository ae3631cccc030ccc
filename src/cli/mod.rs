//! Command-line parsing for the dynamometer card classifier.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! card pipeline; `app` turns these structs into plain config values.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CardTemplate, CycleMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dyna", version, about = "Downhole pump diagnosis from dynamometer cards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one sample file and print the diagnosis.
    Classify(ClassifyArgs),
    /// Classify every `*.csv` in a directory and write a CSV report.
    Batch(BatchArgs),
    /// Print shape properties (area, distance to the fitted figure) as JSON.
    Shape(ShapeArgs),
    /// Generate a synthetic card trace.
    Demo(DemoArgs),
}

/// Peak-load threshold shared by the classifying commands.
#[derive(Debug, Args, Clone)]
pub struct WeightArgs {
    /// Minimum acceptable peak load; anything lower is a flowing well.
    #[arg(short = 'w', long, env = "DYNA_MIN_WEIGHT")]
    pub min_weight: f64,
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    /// Sample file (`angle,displacement,load` rows).
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    #[command(flatten)]
    pub weight: WeightArgs,

    /// Override the device serial number from the file header.
    #[arg(long)]
    pub device_serial: Option<String>,

    /// Override the timestamp from the file header.
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Print the result as a JSON record instead of a text summary.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot of the classified cycle.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Also write the JSON record to this file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Directory holding sample files.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub weight: WeightArgs,

    /// Directory for the report (defaults to DIR).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Report file name prefix.
    #[arg(long, default_value = "pump_report")]
    pub prefix: String,
}

#[derive(Debug, Args, Clone)]
pub struct ShapeArgs {
    /// Sample file (`angle,displacement,load` rows).
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// How to cut the cycle out of the recording.
    #[arg(long, value_enum, default_value_t = CycleMode::Angle)]
    pub cycle: CycleMode,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Card archetype to draw.
    #[arg(short = 't', long, value_enum, default_value_t = CardTemplate::FullPump)]
    pub template: CardTemplate,

    /// Samples per side of the card.
    #[arg(short = 'k', long, default_value_t = 12)]
    pub samples_per_side: usize,

    /// Number of strokes to generate.
    #[arg(long, default_value_t = 2)]
    pub cycles: usize,

    /// Stroke length (displacement units).
    #[arg(long, default_value_t = 100.0)]
    pub stroke: f64,

    #[arg(long, default_value_t = 4_000.0)]
    pub min_load: f64,

    #[arg(long, default_value_t = 12_000.0)]
    pub max_load: f64,

    /// Gaussian noise as a fraction of stroke length and load range.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Peak-load threshold for the diagnosis (defaults to --min-load).
    #[arg(short = 'w', long, env = "DYNA_MIN_WEIGHT")]
    pub min_weight: Option<f64>,

    /// Write the trace to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Skip the diagnosis of the generated trace.
    #[arg(long)]
    pub no_classify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_flags_parse() {
        let cli = Cli::try_parse_from([
            "dyna",
            "classify",
            "well.csv",
            "--min-weight",
            "250.5",
            "--device-serial",
            "D-1",
            "--json",
        ])
        .unwrap();
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.path, PathBuf::from("well.csv"));
        assert_eq!(args.weight.min_weight, 250.5);
        assert_eq!(args.device_serial.as_deref(), Some("D-1"));
        assert!(args.json);
        assert!(!args.plot);
    }

    #[test]
    fn demo_template_uses_kebab_case() {
        let cli = Cli::try_parse_from(["dyna", "demo", "--template", "worn-or-split-barrel", "-k", "8"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(args.template, CardTemplate::WornOrSplitBarrel);
        assert_eq!(args.samples_per_side, 8);
    }

    #[test]
    fn shape_accepts_displacement_cycle() {
        let cli = Cli::try_parse_from(["dyna", "shape", "f.csv", "--cycle", "displacement"]).unwrap();
        let Command::Shape(args) = cli.command else {
            panic!("expected shape");
        };
        assert_eq!(args.cycle, CycleMode::Displacement);
    }
}
