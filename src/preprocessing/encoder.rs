//! Label encoding

use super::{is_numeric_dtype, numeric_column};
use crate::error::{OncoriskError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Ordinal label encoder.
///
/// Distinct values are sorted (numerically for numeric columns, lexically
/// otherwise) and mapped to `0..k`. Missing values stay missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    is_fitted: bool,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the sorted set of distinct values of a column
    pub fn fit(&mut self, series: &Series) -> Result<&mut Self> {
        self.classes = if is_numeric_dtype(series.dtype()) {
            let mut values: Vec<f64> = numeric_column(series)?.into_iter().flatten().collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();
            values.iter().map(|v| v.to_string()).collect()
        } else {
            let distinct: BTreeSet<String> = Self::keys(series)?.into_iter().flatten().collect();
            distinct.into_iter().collect()
        };
        self.is_fitted = true;
        Ok(self)
    }

    /// Encode a column into class codes
    pub fn transform(&self, series: &Series) -> Result<Vec<Option<f64>>> {
        if !self.is_fitted {
            return Err(OncoriskError::ModelNotFitted);
        }

        let lookup: HashMap<&str, usize> = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        Self::keys(series)?
            .into_iter()
            .map(|key| match key {
                None => Ok(None),
                Some(k) => lookup
                    .get(k.as_str())
                    .map(|&code| Some(code as f64))
                    .ok_or_else(|| {
                        OncoriskError::InvalidInput(format!(
                            "unseen label '{}' in column '{}'",
                            k,
                            series.name()
                        ))
                    }),
            })
            .collect()
    }

    pub fn fit_transform(&mut self, series: &Series) -> Result<Vec<Option<f64>>> {
        self.fit(series)?;
        self.transform(series)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// String keys of a column, formatted the same way `fit` formats classes
    fn keys(series: &Series) -> Result<Vec<Option<String>>> {
        if is_numeric_dtype(series.dtype()) {
            return Ok(numeric_column(series)?
                .into_iter()
                .map(|v| v.map(|x| x.to_string()))
                .collect());
        }

        let as_str = series.cast(&DataType::String)?;
        let ca = as_str.str()?;
        Ok(ca
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect())
    }
}
