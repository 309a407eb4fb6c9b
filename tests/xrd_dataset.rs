//! Integration tests for the XRD peak dataset
//!
//! These tests exercise the public library API: loading with fallback,
//! per-sample queries, Scherrer sizes and CSV export/re-import.

use matai::xrd::{export, LoadOptions, ScherrerCalculator};
use matai::{crystallite_size, MataiError, PeakDataset, Sample};
use std::fs;
use tempfile::tempdir;

/// Missing source falls back to the built-in table
#[test]
fn test_missing_source_uses_fallback() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("xrd_zno_zno-mg.csv");

    let ds = PeakDataset::load(Some(missing.as_path())).unwrap();
    assert_eq!(ds.len(), 25);
    assert_eq!(ds.records_for("ZnO").len(), 13);
    assert_eq!(ds.records_for("ZnO:Mg").len(), 12);
    assert_eq!(ds.summary_for("ZnO").peak_count, 13);
    assert_eq!(ds.summary_for("ZnO").max_intensity, 937.5);
    assert_eq!(ds.summary_for("ZnO:Mg").max_intensity, 1140.0);
}

#[test]
fn test_unknown_sample_is_empty() {
    let ds = PeakDataset::fallback();
    assert!(ds.records_for("unknown_sample").is_empty());

    let summary = ds.summary_for("unknown_sample");
    assert_eq!(summary.peak_count, 0);
    assert_eq!(summary.max_intensity, 0.0);
    assert!(summary.min_angle.is_none() && summary.max_angle.is_none());
}

#[test]
fn test_fallback_disabled() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.csv");

    let err = PeakDataset::load_with(
        Some(missing.as_path()),
        LoadOptions {
            allow_fallback: false,
        },
    )
    .unwrap_err();
    assert!(matches!(err, MataiError::DataUnavailable(_)));
}

/// Export to CSV and load the file back
#[test]
fn test_csv_export_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("peaks.csv");

    let exported = PeakDataset::fallback();
    export::to_csv(&exported, &path).unwrap();

    let reloaded = PeakDataset::load(Some(path.as_path())).unwrap();
    for sample in Sample::ALL {
        assert_eq!(reloaded.records(sample), exported.records(sample));
    }
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(
        &path,
        "Sample,H,K,L,2Theta,d_hkl,I\nZnO,1,0,0,31.77,2.814,573.1\nZnO,0,0,2,34.42,2.603,-1\n",
    )
    .unwrap();

    let err = PeakDataset::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, MataiError::ParseError { .. }));
}

/// Scherrer size shrinks as the peak broadens
#[test]
fn test_crystallite_size_over_dataset() {
    let ds = PeakDataset::fallback();
    for record in ds.iter() {
        let narrow = crystallite_size(record, 0.002).unwrap();
        let wide = crystallite_size(record, 0.004).unwrap();
        assert!(narrow > wide && wide > 0.0);
        assert!((narrow / wide - 2.0).abs() < 1e-9);

        let err = crystallite_size(record, 0.0).unwrap_err();
        assert_eq!(err.field(), Some("instrumental_broadening"));
    }

    let metrics = ScherrerCalculator::default()
        .compare(&ds, 0.2_f64.to_radians())
        .unwrap();
    assert_eq!(metrics.total_peaks, 25);
    assert!(metrics.crystallite_change_pct().is_some());
}
