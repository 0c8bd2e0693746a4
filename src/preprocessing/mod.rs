//! Data preprocessing module
//!
//! Turns a raw clinical table into a dense feature matrix:
//! - Identifier and target column handling
//! - Label encoding of targets and categorical features
//! - Mean imputation of missing values
//! - Standard scaling (applied by the trainer on the training split only)

mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use encoder::LabelEncoder;
pub use imputer::MeanImputer;
pub use pipeline::{CancerPreprocessor, PrepareMode, PreparedData};
pub use scaler::StandardScaler;

use crate::error::Result;
use polars::prelude::*;

/// Columns holding row identifiers rather than features
pub const ID_COLUMNS: [&str; 2] = ["id", "ID"];

/// Whether a column can be read as numbers without parsing text
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
    )
}

/// Read a column as optional floats.
///
/// Numeric and boolean columns are cast; text is parsed and anything that
/// does not parse becomes missing.
pub(crate) fn numeric_column(series: &Series) -> Result<Vec<Option<f64>>> {
    if is_numeric_dtype(series.dtype()) {
        let cast = series.cast(&DataType::Float64)?;
        return Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect());
    }

    let cast = series.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()).filter(|x| !x.is_nan()))
        .collect())
}
