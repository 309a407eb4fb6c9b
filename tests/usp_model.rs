//! Integration tests for the USP deposition model

use matai::models::ParameterField;
use matai::usp::{export, SAMPLE_COUNT};
use matai::{DepositionModel, DepositionParameters, MataiError};

fn nominal() -> DepositionParameters {
    DepositionParameters {
        temperature_c: 450.0,
        frequency_mhz: 1.7,
        time_min: 15.0,
        concentration_mol_l: 0.1,
        flow_rate_ml_min: 3.0,
    }
}

#[test]
fn test_nominal_simulation() {
    let result = DepositionModel::new().simulate(&nominal()).unwrap();

    assert_eq!(result.len(), SAMPLE_COUNT);
    assert_eq!(result.time_points[0], 0.0);
    assert_eq!(result.time_points[SAMPLE_COUNT - 1], 15.0);
    assert_eq!(result.thickness[0], 0.0);
    assert_eq!(result.roughness[0], 5.0);
    assert!((90.0..=100.0).contains(&result.quality_score));

    let eps = 1e-12;
    assert!(result.thickness.windows(2).all(|w| w[1] + eps >= w[0]));
    assert!(result.crystallinity.windows(2).all(|w| w[1] + eps >= w[0]));
}

#[test]
fn test_out_of_range_temperature() {
    let params = DepositionParameters {
        temperature_c: 600.0,
        ..nominal()
    };
    let err = DepositionModel::new().simulate(&params).unwrap_err();
    match err {
        MataiError::InvalidParameter { field, value, .. } => {
            assert_eq!(field, "temperature_c");
            assert_eq!(value, 600.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_repeatable() {
    let model = DepositionModel::new();
    assert_eq!(
        model.simulate(&nominal()).unwrap(),
        model.simulate(&nominal()).unwrap()
    );
}

#[test]
fn test_sweep_and_export() {
    let model = DepositionModel::new();
    let values = ParameterField::Time.linspace(5.0, 30.0, 6).unwrap();
    let points = model.sweep(&nominal(), ParameterField::Time, &values).unwrap();

    let swept: Vec<f64> = points.iter().map(|p| p.value).collect();
    assert_eq!(swept, values);
    // time_score saturates at 20 min
    assert!(points.windows(2).all(|w| w[1].quality_score >= w[0].quality_score));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usp.csv");
    export::to_csv(&model.simulate(&nominal()).unwrap(), &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), SAMPLE_COUNT + 1);
}
