//! Synthetic datasets shared by the integration tests

#![allow(dead_code)]

use oncorisk::utils::DataSaver;
use polars::prelude::*;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Deterministic jitter in [0, 1)
fn jitter(i: usize, salt: usize) -> f64 {
    ((i * 37 + salt * 11) % 17) as f64 / 17.0
}

/// Breast dataset: id, M/B diagnosis, nine `_mean` features, one missing
/// radius and a trailing all-empty column
pub fn breast_frame(n: usize) -> DataFrame {
    let mut id = Vec::with_capacity(n);
    let mut diagnosis = Vec::with_capacity(n);
    let mut radius = Vec::with_capacity(n);
    let mut texture = Vec::with_capacity(n);
    let mut perimeter = Vec::with_capacity(n);
    let mut area = Vec::with_capacity(n);
    let mut smoothness = Vec::with_capacity(n);
    let mut compactness = Vec::with_capacity(n);
    let mut concavity = Vec::with_capacity(n);
    let mut concave_points = Vec::with_capacity(n);
    let mut symmetry = Vec::with_capacity(n);

    for i in 0..n {
        let malignant = i % 3 == 0;
        let m = if malignant { 1.0 } else { 0.0 };
        let r = 12.0 + 6.0 * m + jitter(i, 1);

        id.push(842_000 + i as i64);
        diagnosis.push(if malignant { "M" } else { "B" });
        radius.push(if i == 4 { None } else { Some(r) });
        texture.push(17.0 + 4.0 * m + 2.0 * jitter(i, 2));
        perimeter.push(r * 6.4 + jitter(i, 3));
        area.push(r * r * 3.1);
        smoothness.push(0.09 + 0.01 * m + 0.005 * jitter(i, 4));
        compactness.push(0.08 + 0.06 * m + 0.01 * jitter(i, 5));
        concavity.push(0.05 + 0.10 * m + 0.02 * jitter(i, 6));
        concave_points.push(0.03 + 0.05 * m + 0.01 * jitter(i, 7));
        symmetry.push(0.17 + 0.02 * m + 0.01 * jitter(i, 8));
    }

    df!(
        "id" => &id,
        "diagnosis" => &diagnosis,
        "radius_mean" => &radius,
        "texture_mean" => &texture,
        "perimeter_mean" => &perimeter,
        "area_mean" => &area,
        "smoothness_mean" => &smoothness,
        "compactness_mean" => &compactness,
        "concavity_mean" => &concavity,
        "concave points_mean" => &concave_points,
        "symmetry_mean" => &symmetry,
        "notes" => &vec![None::<f64>; n]
    )
    .unwrap()
}

/// Lung dataset: text gender, 1/2 coded symptoms, YES/NO target
pub fn lung_frame(n: usize) -> DataFrame {
    let mut gender = Vec::with_capacity(n);
    let mut age = Vec::with_capacity(n);
    let mut smoking = Vec::with_capacity(n);
    let mut yellow_fingers = Vec::with_capacity(n);
    let mut anxiety = Vec::with_capacity(n);
    let mut fatigue = Vec::with_capacity(n);
    let mut target = Vec::with_capacity(n);

    for i in 0..n {
        let sick = i % 4 != 0;
        gender.push(if i % 2 == 0 { "M" } else { "F" });
        age.push(45 + (i % 30) as i64);
        smoking.push(if sick { 2i64 } else { 1 });
        yellow_fingers.push(if sick || i % 8 == 0 { 2i64 } else { 1 });
        anxiety.push(1 + (i % 2) as i64);
        fatigue.push(if sick { 2i64 } else { 1 + (i % 3 == 0) as i64 });
        target.push(if sick { "YES" } else { "NO" });
    }

    df!(
        "gender" => &gender,
        "age" => &age,
        "smoking" => &smoking,
        "yellow_fingers" => &yellow_fingers,
        "anxiety" => &anxiety,
        "fatigue" => &fatigue,
        "lung_cancer" => &target
    )
    .unwrap()
}

/// Prostate dataset: numeric clinical features and a 0/1 target
pub fn prostate_frame(n: usize) -> DataFrame {
    let mut age = Vec::with_capacity(n);
    let mut psa = Vec::with_capacity(n);
    let mut psa_density = Vec::with_capacity(n);
    let mut gleason = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);
    let mut dre = Vec::with_capacity(n);
    let mut family = Vec::with_capacity(n);
    let mut biopsy = Vec::with_capacity(n);
    let mut target = Vec::with_capacity(n);

    for i in 0..n {
        let high = i % 5 < 2;
        let h = if high { 1.0 } else { 0.0 };
        let p = 3.0 + 9.0 * h + 2.0 * jitter(i, 1);
        let v = 35.0 + 20.0 * jitter(i, 2);

        age.push(55 + (i % 20) as i64);
        psa.push(p);
        psa_density.push(p / v);
        gleason.push(6 + 2 * high as i64);
        volume.push(v);
        dre.push(if high { 1i64 } else { (i % 7 == 0) as i64 });
        family.push((i % 3 == 0) as i64);
        biopsy.push((i % 4 == 0) as i64);
        target.push(high as i64);
    }

    df!(
        "age" => &age,
        "psa" => &psa,
        "psa_density" => &psa_density,
        "gleason" => &gleason,
        "prostate_volume" => &volume,
        "dre" => &dre,
        "family_history" => &family,
        "previous_biopsy" => &biopsy,
        "target" => &target
    )
    .unwrap()
}

/// Write a frame as CSV under `dir`
pub fn write_csv(dir: &Path, name: &str, df: &DataFrame) -> PathBuf {
    let path = dir.join(name);
    let mut df = df.clone();
    DataSaver::save_csv(&mut df, &path).unwrap();
    path
}

/// A malignant-looking breast record in form-field names
pub fn breast_record() -> Map<String, Value> {
    object(json!({
        "radiusMean": 18.4,
        "textureMean": "22.1",
        "perimeterMean": 118.0,
        "areaMean": 1050.0,
        "smoothnessMean": 0.101,
        "compactnessMean": 0.141,
        "concavityMean": 0.158,
        "concavePointsMean": 0.084,
        "symmetryMean": 0.19
    }))
}

/// A lung record with upper-case keys and yes/no answers
pub fn lung_record() -> Map<String, Value> {
    object(json!({
        "GENDER": "M",
        "AGE": 61,
        "SMOKING": 2,
        "YELLOW_FINGERS": "yes",
        "ANXIETY": "no",
        "FATIGUE": 2
    }))
}

/// A high-risk prostate record in form-field names
pub fn prostate_record() -> Map<String, Value> {
    object(json!({
        "age": "68",
        "psa": 12.5,
        "psaDensity": 0.3,
        "gleason": 8,
        "prostatevolume": 41.0,
        "dre": "yes",
        "familyHistory": "no",
        "previousBiopsy": ""
    }))
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
