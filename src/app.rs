//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the requested command
//! - prints reports/plots and writes optional exports

use std::io::Write;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, ClassifyArgs, Command, DemoArgs, ShapeArgs};
use crate::domain::{BatchConfig, ClassifyConfig, DemoConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dyna` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; DYNA_MIN_WEIGHT may come from the real environment.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Classify(args) => handle_classify(&classify_config_from_args(&args)),
        Command::Batch(args) => handle_batch(&batch_config_from_args(&args)),
        Command::Shape(args) => handle_shape(&args),
        Command::Demo(args) => handle_demo(&demo_config_from_args(&args)),
    }
}

fn init_tracing() {
    // Stdout carries results, so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_classify(config: &ClassifyConfig) -> Result<(), AppError> {
    let run = pipeline::run_classify(
        &config.path,
        config.min_weight,
        config.device_serial.as_deref(),
        config.timestamp.as_deref(),
    )?;

    let file = config.path.display().to_string();
    let record = crate::report::classification_record(
        &run.header,
        &run.diagnosis,
        &file,
        Local::now().to_rfc3339(),
    );

    if config.json {
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| AppError::new(4, format!("Failed to serialize result: {e}")))?;
        println!("{json}");
    } else {
        println!(
            "{}",
            crate::report::format_summary(&run.ingest, &run.header, &run.diagnosis, config)
        );
    }

    if config.plot {
        match &run.diagnosis.card {
            Some(geometry) => println!(
                "{}",
                crate::plot::render_card_plot(geometry, config.plot_width, config.plot_height)
            ),
            None => tracing::warn!("no card geometry to plot for a flowing well"),
        }
    }

    if let Some(path) = &config.export {
        crate::io::export::write_record_json(path, &record)?;
    }

    Ok(())
}

fn handle_batch(config: &BatchConfig) -> Result<(), AppError> {
    let rows = pipeline::run_batch(config)?;
    let out_dir = config.out_dir.as_deref().unwrap_or(&config.dir);
    let path = crate::io::export::write_batch_report(out_dir, &config.report_prefix, &rows)?;

    let failed = rows.iter().filter(|r| r.pump_state == "error").count();
    println!(
        "Classified {} file(s), {failed} failed. Report: {}",
        rows.len(),
        path.display()
    );
    Ok(())
}

fn handle_shape(args: &ShapeArgs) -> Result<(), AppError> {
    let ingest = crate::io::ingest::load_card_file(&args.path)?;
    let props = crate::metrics::shape_properties(&ingest.samples, args.cycle)?;
    let json = serde_json::to_string_pretty(&props)
        .map_err(|e| AppError::new(4, format!("Failed to serialize shape properties: {e}")))?;
    println!("{json}");
    Ok(())
}

fn handle_demo(config: &DemoConfig) -> Result<(), AppError> {
    let card = crate::data::generate_card(config)?;

    match &config.out {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
            crate::io::export::write_samples_csv(&mut file, &card.header, &card.samples)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            crate::io::export::write_samples_csv(&mut lock, &card.header, &card.samples)?;
            lock.flush()
                .map_err(|e| AppError::new(2, format!("Failed to write samples: {e}")))?;
        }
    }

    if config.classify {
        let min_weight = config.min_weight.unwrap_or(config.min_load);
        let shape = crate::card::select_shape(&card.samples, min_weight)?;
        // Keep stdout a clean CSV when the trace goes there.
        if config.out.is_some() {
            println!("Diagnosis: {shape}");
        } else {
            eprintln!("Diagnosis: {shape}");
        }
    }

    Ok(())
}

pub fn classify_config_from_args(args: &ClassifyArgs) -> ClassifyConfig {
    ClassifyConfig {
        path: args.path.clone(),
        min_weight: args.weight.min_weight,
        device_serial: args.device_serial.clone(),
        timestamp: args.timestamp.clone(),
        json: args.json,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
    }
}

pub fn batch_config_from_args(args: &BatchArgs) -> BatchConfig {
    BatchConfig {
        dir: args.dir.clone(),
        min_weight: args.weight.min_weight,
        out_dir: args.out.clone(),
        report_prefix: args.prefix.clone(),
    }
}

pub fn demo_config_from_args(args: &DemoArgs) -> DemoConfig {
    DemoConfig {
        template: args.template,
        samples_per_side: args.samples_per_side,
        cycles: args.cycles,
        stroke_length: args.stroke,
        min_load: args.min_load,
        max_load: args.max_load,
        noise: args.noise,
        seed: args.seed,
        min_weight: args.min_weight,
        classify: !args.no_classify,
        out: args.out.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn demo_args_map_to_config() {
        let cli = Cli::try_parse_from(["dyna", "demo", "--noise", "0.01", "--no-classify", "--cycles", "3"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        let config = demo_config_from_args(&args);
        assert_eq!(config.noise, 0.01);
        assert_eq!(config.cycles, 3);
        assert!(!config.classify);
        assert_eq!(config.samples_per_side, DemoConfig::default().samples_per_side);
    }

    #[test]
    fn batch_args_map_to_config() {
        let cli = Cli::try_parse_from(["dyna", "batch", "cards", "-w", "100", "--prefix", "march"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        let config = batch_config_from_args(&args);
        assert_eq!(config.min_weight, 100.0);
        assert_eq!(config.report_prefix, "march");
        assert!(config.out_dir.is_none());
    }
}
