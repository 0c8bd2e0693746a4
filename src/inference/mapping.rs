//! Mapping of external form fields onto dataset columns

use crate::cancer::CancerType;
use crate::error::{OncoriskError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const BREAST_FIELDS: [(&str, &str); 9] = [
    ("radiusMean", "radius_mean"),
    ("textureMean", "texture_mean"),
    ("perimeterMean", "perimeter_mean"),
    ("areaMean", "area_mean"),
    ("smoothnessMean", "smoothness_mean"),
    ("compactnessMean", "compactness_mean"),
    ("concavityMean", "concavity_mean"),
    ("concavePointsMean", "concave points_mean"),
    ("symmetryMean", "symmetry_mean"),
];

const PROSTATE_FIELDS: [(&str, &str); 8] = [
    ("age", "age"),
    ("psa", "psa"),
    ("psaDensity", "psa_density"),
    ("gleason", "gleason"),
    ("prostatevolume", "prostate_volume"),
    ("dre", "dre"),
    ("familyHistory", "family_history"),
    ("previousBiopsy", "previous_biopsy"),
];

/// Convert a record of form fields into feature values keyed by column name.
///
/// Fields the cancer type does not know are ignored; columns the record does
/// not mention are left for the caller to backfill.
pub fn map_fields(cancer_type: CancerType, fields: &Map<String, Value>) -> Result<BTreeMap<String, f64>> {
    match cancer_type {
        CancerType::Breast => map_breast(fields),
        CancerType::Lung => map_lung(fields),
        CancerType::Prostate => map_prostate(fields),
    }
}

fn map_breast(fields: &Map<String, Value>) -> Result<BTreeMap<String, f64>> {
    let mut mapped = BTreeMap::new();
    for (field, column) in BREAST_FIELDS {
        if let Some(value) = fields.get(field) {
            mapped.insert(column.to_string(), strict_number(field, value)?);
        }
    }
    Ok(mapped)
}

fn map_lung(fields: &Map<String, Value>) -> Result<BTreeMap<String, f64>> {
    let mut mapped = BTreeMap::new();
    for (field, value) in fields {
        let number = match value {
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "yes" | "y" | "1" | "true" => 1.0,
                "no" | "n" | "0" | "false" => 0.0,
                other => other.parse::<f64>().unwrap_or(0.0),
            },
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::Bool(b) => bool_value(*b),
            Value::Null => 0.0,
            Value::Array(_) | Value::Object(_) => return Err(not_a_number(field, value)),
        };
        mapped.insert(field.to_lowercase(), number);
    }
    Ok(mapped)
}

fn map_prostate(fields: &Map<String, Value>) -> Result<BTreeMap<String, f64>> {
    let mut mapped = BTreeMap::new();
    for (field, column) in PROSTATE_FIELDS {
        let Some(value) = fields.get(field) else {
            continue;
        };
        let number = match value {
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "yes" | "y" | "1" => 1.0,
                "no" | "n" | "0" | "" => 0.0,
                _ => strict_number(field, value)?,
            },
            Value::Null => 0.0,
            _ => strict_number(field, value)?,
        };
        mapped.insert(column.to_string(), number);
    }
    Ok(mapped)
}

/// Numeric value of a field; text must parse as a float
fn strict_number(field: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| not_a_number(field, value)),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| not_a_number(field, value)),
        Value::Bool(b) => Ok(bool_value(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(not_a_number(field, value)),
    }
}

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn not_a_number(field: &str, value: &Value) -> OncoriskError {
    OncoriskError::InvalidInput(format!("field '{}' is not a number: {}", field, value))
}
