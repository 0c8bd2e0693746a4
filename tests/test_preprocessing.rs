//! Integration test: Preprocessing of CSV datasets per cancer type

mod common;

use oncorisk::preprocessing::{CancerPreprocessor, StandardScaler};
use oncorisk::utils::DataLoader;
use oncorisk::{CancerType, OncoriskError};
use tempfile::TempDir;

#[test]
fn test_breast_csv_preprocessing() {
    let dir = TempDir::new().unwrap();
    let path = common::write_csv(dir.path(), "Breast_Cancer.csv", &common::breast_frame(30));
    let df = DataLoader::new().load_csv(&path).unwrap();

    let prepared = CancerPreprocessor::new(CancerType::Breast).fit_transform(&df).unwrap();

    // id and the empty column are gone, the nine measurements remain
    assert_eq!(prepared.n_features(), 9);
    assert!(!prepared.feature_names.iter().any(|n| n == "id" || n == "notes"));
    assert_eq!(prepared.feature_names[7], "concave points_mean");
    assert_eq!(prepared.n_samples(), 30);
    assert!(prepared.x.iter().all(|v| v.is_finite()));

    let encoder = prepared.label_encoder.unwrap();
    assert_eq!(encoder.classes(), &["B".to_string(), "M".to_string()]);
    let y = prepared.y.unwrap();
    assert_eq!(y[0], 1.0);
    assert_eq!(y[1], 0.0);
}

#[test]
fn test_breast_missing_value_imputed_with_mean() {
    let df = common::breast_frame(12);
    let prepared = CancerPreprocessor::new(CancerType::Breast).fit_transform(&df).unwrap();

    let observed: Vec<f64> = (0..12).filter(|&i| i != 4).map(|i| prepared.x[[i, 0]]).collect();
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    assert!((prepared.x[[4, 0]] - mean).abs() < 1e-9);
}

#[test]
fn test_lung_csv_preprocessing() {
    let dir = TempDir::new().unwrap();
    let path = common::write_csv(dir.path(), "lung_cancer.csv", &common::lung_frame(16));
    let df = DataLoader::new().load_csv(&path).unwrap();

    let prepared = CancerPreprocessor::new(CancerType::Lung).fit_transform(&df).unwrap();

    assert_eq!(prepared.feature_names[0], "gender");
    assert_eq!(prepared.n_features(), 6);
    // M/F label encoded: F=0, M=1
    assert_eq!(prepared.x[[0, 0]], 1.0);
    assert_eq!(prepared.x[[1, 0]], 0.0);
    // NO=0, YES=1
    let y = prepared.y.unwrap();
    assert_eq!(y[0], 0.0);
    assert_eq!(y[1], 1.0);
}

#[test]
fn test_prostate_numeric_target_kept() {
    let df = common::prostate_frame(20);
    let prepared = CancerPreprocessor::new(CancerType::Prostate).fit_transform(&df).unwrap();

    assert!(prepared.label_encoder.is_none());
    assert_eq!(prepared.n_features(), 8);
    let positives = prepared.y.unwrap().iter().filter(|&&v| v == 1.0).count();
    assert_eq!(positives, 8);
}

#[test]
fn test_missing_target_column() {
    let df = common::prostate_frame(10).drop("target").unwrap();
    let err = CancerPreprocessor::new(CancerType::Prostate).fit_transform(&df).unwrap_err();
    assert!(matches!(err, OncoriskError::TargetNotFound(CancerType::Prostate)));

    // batch mode does not need it
    let prepared = CancerPreprocessor::new(CancerType::Prostate).transform_batch(&df).unwrap();
    assert_eq!(prepared.n_samples(), 10);
    assert!(prepared.y.is_none());
}

#[test]
fn test_scaler_on_prepared_features() {
    let df = common::prostate_frame(25);
    let prepared = CancerPreprocessor::new(CancerType::Prostate).fit_transform(&df).unwrap();

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&prepared.x).unwrap();
    assert_eq!(scaler.n_features(), 8);

    for column in scaled.columns() {
        let mean = column.mean().unwrap();
        assert!(mean.abs() < 1e-9);
    }
}

#[test]
fn test_lung_na_age_imputed_not_encoded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lung_na.csv");
    std::fs::write(&path, "GENDER,AGE,LUNG_CANCER\nM,69,YES\nF,100,NO\nF,NA,YES\nM,45,NO\n").unwrap();
    let df = DataLoader::new().load_csv(&path).unwrap();

    let prepared = CancerPreprocessor::new(CancerType::Lung).fit_transform(&df).unwrap();

    assert_eq!(prepared.feature_names, vec!["GENDER", "AGE"]);
    let age = prepared.x.column(1).to_vec();
    assert_eq!(age[0], 69.0);
    assert_eq!(age[1], 100.0);
    assert!((age[2] - 214.0 / 3.0).abs() < 1e-9);
    assert_eq!(age[3], 45.0);
}

#[test]
fn test_prostate_na_target_row_dropped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prostate_na.csv");
    std::fs::write(&path, "psa,target\n4.1,0\n9.8,1\n5.5,NA\n12.0,1\n").unwrap();
    let df = DataLoader::new().load_csv(&path).unwrap();

    let prepared = CancerPreprocessor::new(CancerType::Prostate).fit_transform(&df).unwrap();

    assert_eq!(prepared.n_samples(), 3);
    assert!(prepared.label_encoder.is_none());
    assert_eq!(prepared.y.unwrap().to_vec(), vec![0.0, 1.0, 1.0]);
    assert_eq!(prepared.x.column(0).to_vec(), vec![4.1, 9.8, 12.0]);
}
