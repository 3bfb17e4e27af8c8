//! Report Builder Library
//!
//! Trial data → metric aggregation → PDF report with SHA256 checksum
//! C3D capture → skeleton flipbook / snapshot sheet (PDF)

pub mod chart;
pub mod layout;
pub mod pages;
pub mod pdf;
pub mod report;
pub mod skeleton;
pub mod table;

use anyhow::{Context, Result};
use mocap_core::analysis::{describe, ColumnStats};
use mocap_core::{sample_trials, PoiFilter, ReportConfig, TrialTable};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::info;

pub use pdf::PdfDocument;
pub use report::{ReportGenerator, ReportMetadata};
pub use skeleton::{render_flipbook, render_snapshots, RenderMetadata};

/// Metadata of a written PDF
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfMetadata {
    /// Number of pages
    pub page_count: usize,
    /// File size (bytes)
    pub size_bytes: u64,
    /// SHA256 checksum (hex string)
    pub checksum: String,
    /// Creation time (RFC3339)
    pub created_at: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Serialize a document and write it to disk
///
/// # Arguments
///
/// * `document` - Pages to serialize
/// * `output` - Output PDF path (parent directories are created)
///
/// # Returns
///
/// Page count, size and checksum of the written file
pub fn write_pdf(document: PdfDocument, output: &Path) -> Result<PdfMetadata> {
    let page_count = document.page_count();

    // 1. Serialize every page
    let bytes = document
        .to_bytes()
        .with_context(|| format!("Failed to render PDF: {}", output.display()))?;

    // 2. SHA256 checksum
    let checksum = sha256_hex(&bytes);

    // 3. Write the output file
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    Ok(PdfMetadata {
        page_count,
        size_bytes: bytes.len() as u64,
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Check a written file against its SHA256 checksum
pub fn verify_pdf(path: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(sha256_hex(&bytes) == expected_checksum)
}

/// Write any metadata value as pretty JSON
pub fn save_metadata<T: Serialize>(path: &Path, meta: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(meta).context("Failed to serialize metadata")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, json)
        .with_context(|| format!("Failed to write metadata file: {}", path.display()))?;
    Ok(())
}

/// Trials a report is built from
///
/// The configured CSV narrowed by the cohort filter (unless
/// `apply_filter` is off), or the built-in sample session when no CSV is
/// configured. The sample session is never filtered.
pub fn load_trials(config: &ReportConfig) -> Result<TrialTable> {
    let Some(csv) = &config.csv else {
        info!("No CSV configured, using the built-in sample session");
        return sample_trials().context("Failed to build sample session");
    };

    let table = TrialTable::from_csv_path(csv)
        .with_context(|| format!("Failed to read CSV file: {}", csv.display()))?;
    let Some(filter) = cohort_filter(config) else {
        return Ok(table);
    };

    let cohort = filter
        .apply(&table)
        .context("Failed to apply cohort filter")?;
    info!(
        "{} of {} trials match the cohort filter",
        cohort.len(),
        table.len()
    );
    Ok(cohort)
}

/// Cohort filter a configuration applies to CSV input, `None` when
/// `apply_filter` is off.
pub fn cohort_filter(config: &ReportConfig) -> Option<&PoiFilter> {
    config.apply_filter.then_some(&config.filter)
}

/// Mean and std dev of every numeric CSV column
///
/// # Arguments
///
/// * `csv` - POI metrics CSV
/// * `filter` - Cohort filter applied before summarizing, if any
pub fn column_stats(csv: &Path, filter: Option<&PoiFilter>) -> Result<Vec<ColumnStats>> {
    let table = TrialTable::from_csv_path(csv)
        .with_context(|| format!("Failed to read CSV file: {}", csv.display()))?;
    let table = match filter {
        Some(filter) => filter
            .apply(&table)
            .context("Failed to apply cohort filter")?,
        None => table,
    };
    Ok(describe(&table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{Canvas, LETTER_LANDSCAPE};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const CSV: &str = "\
p_throws,pitch_speed_mph,arm_slot,elbow_flexion_rel
R,90.0,41,24
R,91.0,43,26
R,99.0,42,60
L,90.0,40,60
";

    fn csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(CSV.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_write_and_verify_pdf() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("nested/out/test.pdf");

        let mut document = PdfDocument::new("Test", LETTER_LANDSCAPE);
        document.add_page(Canvas::new());
        let meta = write_pdf(document, &output)?;

        assert_eq!(meta.page_count, 1);
        assert_eq!(meta.size_bytes, fs::metadata(&output)?.len());
        assert!(verify_pdf(&output, &meta.checksum)?);
        assert!(!verify_pdf(&output, "0000")?);
        Ok(())
    }

    #[test]
    fn test_column_stats_with_and_without_filter() -> Result<()> {
        let file = csv_file()?;

        let all = column_stats(file.path(), None)?;
        let elbow = all.iter().find(|s| s.column == "elbow_flexion_rel").unwrap();
        assert_eq!(elbow.count, 4);
        assert_eq!(elbow.mean, 42.5);

        let cohort = column_stats(file.path(), Some(&PoiFilter::default()))?;
        let elbow = cohort.iter().find(|s| s.column == "elbow_flexion_rel").unwrap();
        assert_eq!(elbow.count, 2);
        assert_eq!(elbow.mean, 25.0);
        Ok(())
    }

    #[test]
    fn test_column_stats_use_configured_filter() -> Result<()> {
        let file = csv_file()?;
        let config = ReportConfig::from_yaml(
            "filter: { min_speed_mph: 88, max_speed_mph: 100, throws: R }\n",
        )?;

        let stats = column_stats(file.path(), cohort_filter(&config))?;
        let elbow = stats.iter().find(|s| s.column == "elbow_flexion_rel").unwrap();
        assert_eq!(elbow.count, 3);

        let unfiltered = ReportConfig {
            apply_filter: false,
            ..config
        };
        assert!(cohort_filter(&unfiltered).is_none());
        let stats = column_stats(file.path(), cohort_filter(&unfiltered))?;
        let elbow = stats.iter().find(|s| s.column == "elbow_flexion_rel").unwrap();
        assert_eq!(elbow.count, 4);
        Ok(())
    }

    #[test]
    fn test_load_trials() -> Result<()> {
        let file = csv_file()?;

        let sample = load_trials(&ReportConfig::default())?;
        assert_eq!(sample.len(), 5);

        let config = ReportConfig {
            csv: Some(file.path().to_path_buf()),
            ..ReportConfig::default()
        };
        assert_eq!(load_trials(&config)?.len(), 2);

        let unfiltered = ReportConfig {
            apply_filter: false,
            ..config
        };
        assert_eq!(load_trials(&unfiltered)?.len(), 4);
        Ok(())
    }

    #[test]
    fn test_missing_csv_has_context() {
        let config = ReportConfig {
            csv: Some("/nonexistent/poi_metrics.csv".into()),
            ..ReportConfig::default()
        };
        let err = load_trials(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to read CSV file"));
    }

    #[test]
    fn test_save_metadata() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("meta/report.json");
        let meta = PdfMetadata {
            page_count: 9,
            size_bytes: 1234,
            checksum: "abc".to_string(),
            created_at: "2025-08-29T00:00:00Z".to_string(),
        };
        save_metadata(&path, &meta)?;
        let loaded: PdfMetadata = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(loaded.page_count, 9);
        Ok(())
    }
}
