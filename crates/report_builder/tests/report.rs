//! End-to-end report generation

use anyhow::Result;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use mocap_core::ReportConfig;
use report_builder::pages::PAGE_TITLES;
use report_builder::{verify_pdf, ReportGenerator};
use std::fs;
use tempfile::tempdir;

/// Text operands of every `Tj` on a page.
fn page_texts(doc: &Document, page: ObjectId) -> Result<Vec<String>> {
    let content = Content::decode(&doc.get_page_content(page)?)?;
    Ok(content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect())
}

fn load(path: &std::path::Path) -> Result<Document> {
    let mut doc = Document::load(path)?;
    doc.decompress();
    Ok(doc)
}

#[test]
fn test_sample_report_pages_in_order() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("mocap_report.pdf");
    let config = ReportConfig {
        date: Some("August 29, 2025".to_string()),
        ..ReportConfig::default()
    };

    let (_, meta) = ReportGenerator::from_config(config)?.generate(&output)?;
    assert!(verify_pdf(&output, &meta.pdf.checksum)?);

    let doc = load(&output)?;
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 9);

    for (i, (&number, &id)) in pages.iter().enumerate() {
        let texts = page_texts(&doc, id)?;
        assert!(
            texts.iter().any(|t| t == PAGE_TITLES[i]),
            "page {} is missing its title {:?}",
            number,
            PAGE_TITLES[i]
        );
        assert!(texts.iter().any(|t| t == "Mocap Report: Luke Coats"));
        assert!(texts.iter().any(|t| t == &format!("Page {} of 9", number)));
        assert!(texts.iter().any(|t| t == "August 29, 2025"));
    }
    Ok(())
}

#[test]
fn test_report_from_filtered_csv() -> Result<()> {
    let dir = tempdir()?;
    let csv = dir.path().join("poi_metrics.csv");
    fs::write(
        &csv,
        "p_throws,pitch_speed_mph,arm_slot,elbow_flexion_rel\n\
         R,90.0,41,24\n\
         R,91.0,43,26\n\
         R,99.0,42,60\n",
    )?;
    let config = ReportConfig {
        player_name: "Test Pitcher".to_string(),
        csv: Some(csv),
        date: Some("today".to_string()),
        ..ReportConfig::default()
    };

    let output = dir.path().join("out/report.pdf");
    let (_, meta) = ReportGenerator::from_config(config)?.generate(&output)?;
    assert_eq!(meta.trials, 2);
    assert_eq!(meta.pdf.page_count, 9);

    let doc = load(&output)?;
    let first = *doc.get_pages().values().next().expect("first page");
    let texts = page_texts(&doc, first)?;
    assert!(texts.iter().any(|t| t == "Mocap Report: Test Pitcher"));
    assert!(texts.iter().any(|t| t == "N/A"));
    Ok(())
}

#[test]
fn test_cohort_without_matches_fails() -> Result<()> {
    let dir = tempdir()?;
    let csv = dir.path().join("poi_metrics.csv");
    fs::write(
        &csv,
        "p_throws,pitch_speed_mph,arm_slot,elbow_flexion_rel\nL,90.0,41,24\n",
    )?;
    let config = ReportConfig {
        csv: Some(csv),
        ..ReportConfig::default()
    };
    let output = dir.path().join("report.pdf");
    assert!(ReportGenerator::from_config(config).is_err());
    assert!(!output.exists());
    Ok(())
}
