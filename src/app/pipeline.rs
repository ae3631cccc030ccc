//! Shared classification pipeline used by the single-file and batch commands.
//!
//! ingest -> header overrides -> peak-load check / cycle / split / classify

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::card::{Diagnosis, diagnose};
use crate::domain::{BatchConfig, CardHeader};
use crate::error::AppError;
use crate::io::export::{ReportRow, is_report_file};
use crate::io::ingest::{IngestedCard, load_card_file};
use crate::report::{effective_header, error_row, report_row};

/// All computed outputs of classifying one file.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedCard,
    pub header: CardHeader,
    pub diagnosis: Diagnosis,
}

/// Load, then diagnose one sample file.
pub fn run_classify(
    path: &Path,
    min_weight: f64,
    device_serial: Option<&str>,
    timestamp: Option<&str>,
) -> Result<RunOutput, AppError> {
    let ingest = load_card_file(path)?;
    let header = effective_header(&ingest.header, device_serial, timestamp);
    let diagnosis = diagnose(&ingest.samples, min_weight)?;
    tracing::info!(path = %path.display(), shape = %diagnosis.shape, "classified");

    Ok(RunOutput {
        ingest,
        header,
        diagnosis,
    })
}

/// Sample files in `dir`, sorted by name.
///
/// Reports an earlier batch wrote with `report_prefix` are not samples.
pub fn list_sample_files(dir: &Path, report_prefix: &str) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to read directory '{}': {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| is_report_file(n, report_prefix))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Classify every sample file in the batch directory, in parallel.
///
/// A file that fails becomes an `error` row; it never aborts the batch.
pub fn run_batch(config: &BatchConfig) -> Result<Vec<ReportRow>, AppError> {
    let files = list_sample_files(&config.dir, &config.report_prefix)?;
    if files.is_empty() {
        return Err(AppError::new(
            3,
            format!("No .csv sample files found in '{}'.", config.dir.display()),
        ));
    }

    let rows = files
        .par_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match run_classify(path, config.min_weight, None, None) {
                Ok(run) => report_row(&name, &run.header, &run.diagnosis, run.ingest.row_errors.len()),
                Err(err) => {
                    tracing::warn!(file = %name, error = %err, "classification failed");
                    error_row(&name, &err.to_string())
                }
            }
        })
        .collect();

    Ok(rows)
}
