//! # Report Generation
//!
//! Aggregates trials into a [`MetricSet`], lays out the nine pages and
//! writes the PDF. The document is serialized in memory first, so a failed
//! build never leaves a partial file behind.

use crate::layout::{PageChrome, ReportPage};
use crate::pages::{build_pages, ReportContext};
use crate::pdf::{PdfDocument, LETTER_LANDSCAPE};
use crate::{load_trials, write_pdf, PdfMetadata};
use anyhow::{Context, Result};
use mocap_core::{MetricSet, ReportConfig, TrialTable, REFERENCE_TABLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Report metadata (sidecar JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub player_name: String,
    pub date: String,
    pub velocity_range: String,
    /// Trials aggregated into the report
    pub trials: usize,
    #[serde(flatten)]
    pub pdf: PdfMetadata,
}

/// Today's date as "August 29, 2025".
pub fn today() -> String {
    chrono::Local::now().format("%B %-d, %Y").to_string()
}

pub struct ReportGenerator {
    config: ReportConfig,
    metrics: MetricSet,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig, trials: &TrialTable) -> Result<Self> {
        config.check().context("Invalid report configuration")?;
        let metrics = MetricSet::from_trials(trials, &config.columns)
            .context("Failed to aggregate trial metrics")?;
        Ok(Self { config, metrics })
    }

    /// Load the configured trials (CSV or sample session) and aggregate them.
    pub fn from_config(config: ReportConfig) -> Result<Self> {
        let trials = load_trials(&config)?;
        Self::new(config, &trials)
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    pub fn date(&self) -> String {
        self.config.date.clone().unwrap_or_else(today)
    }

    pub fn context(&self) -> ReportContext<'_> {
        ReportContext::new(&self.metrics, &REFERENCE_TABLE, self.config.events)
    }

    pub fn pages(&self) -> Vec<ReportPage> {
        build_pages(&self.context())
    }

    /// Every page drawn with the header bar and footer.
    pub fn document(&self) -> PdfDocument {
        let chrome = PageChrome {
            player_name: self.config.player_name.clone(),
            velocity_range: self.config.velocity_range.clone(),
            date: self.date(),
        };
        let pages = self.pages();
        let total = pages.len();
        let mut document = PdfDocument::new(
            &format!("Mocap Report: {}", self.config.player_name),
            LETTER_LANDSCAPE,
        );
        for (i, page) in pages.iter().enumerate() {
            document.add_page(page.render(&chrome, LETTER_LANDSCAPE, i + 1, total));
        }
        document
    }

    /// Write the report PDF
    ///
    /// # Returns
    ///
    /// The output path and the report metadata
    pub fn generate(&self, output: &Path) -> Result<(PathBuf, ReportMetadata)> {
        info!(
            "Building report for {} from {} trials",
            self.config.player_name,
            self.metrics.trials()
        );
        let pdf = write_pdf(self.document(), output)?;
        info!("Wrote {} pages to {}", pdf.page_count, output.display());

        Ok((
            output.to_path_buf(),
            ReportMetadata {
                player_name: self.config.player_name.clone(),
                date: self.date(),
                velocity_range: self.config.velocity_range.clone(),
                trials: self.metrics.trials(),
                pdf,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify_pdf;
    use tempfile::tempdir;

    #[test]
    fn test_generate_sample_report() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("reports/luke/report.pdf");
        let config = ReportConfig {
            date: Some("August 29, 2025".to_string()),
            ..ReportConfig::default()
        };

        let generator = ReportGenerator::from_config(config)?;
        let (path, meta) = generator.generate(&output)?;

        assert_eq!(path, output);
        assert!(output.exists());
        assert_eq!(meta.pdf.page_count, 9);
        assert_eq!(meta.trials, 5);
        assert_eq!(meta.date, "August 29, 2025");
        assert!(verify_pdf(&output, &meta.pdf.checksum)?);
        Ok(())
    }

    #[test]
    fn test_metadata_is_flat_json() -> Result<()> {
        let dir = tempdir()?;
        let generator = ReportGenerator::from_config(ReportConfig::default())?;
        let (_, meta) = generator.generate(&dir.path().join("r.pdf"))?;
        let json = serde_json::to_value(&meta)?;
        assert_eq!(json["page_count"], 9);
        assert_eq!(json["player_name"], "Luke Coats");
        Ok(())
    }

    #[test]
    fn test_default_date_is_today() -> Result<()> {
        let generator = ReportGenerator::from_config(ReportConfig::default())?;
        assert_eq!(generator.date(), today());
        Ok(())
    }

    #[test]
    fn test_empty_cohort_is_an_error() {
        let trials = TrialTable::with_rows(0);
        assert!(ReportGenerator::new(ReportConfig::default(), &trials).is_err());
    }
}
