//! Missing value imputation

use crate::error::{OncoriskError, Result};
use serde::{Deserialize, Serialize};

/// Fills missing numeric values with the column mean
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeanImputer {
    /// Mean per column; `None` when the column had no observed value
    fill_values: Vec<Option<f64>>,
    is_fitted: bool,
}

impl MeanImputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the mean of the observed values of every column
    pub fn fit(&mut self, columns: &[Vec<Option<f64>>]) -> &mut Self {
        self.fill_values = columns
            .iter()
            .map(|col| {
                let (sum, count) = col
                    .iter()
                    .flatten()
                    .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
                (count > 0).then(|| sum / count as f64)
            })
            .collect();
        self.is_fitted = true;
        self
    }

    /// Replace missing values with the fitted means.
    ///
    /// Columns without a fill value come back unchanged and may still hold
    /// missing entries; check [`MeanImputer::fill_value`] before use.
    pub fn transform(&self, columns: Vec<Vec<Option<f64>>>) -> Result<Vec<Vec<Option<f64>>>> {
        if !self.is_fitted {
            return Err(OncoriskError::ModelNotFitted);
        }
        if columns.len() != self.fill_values.len() {
            return Err(OncoriskError::ShapeError {
                expected: format!("{} columns", self.fill_values.len()),
                actual: format!("{} columns", columns.len()),
            });
        }

        Ok(columns
            .into_iter()
            .zip(self.fill_values.iter())
            .map(|(col, fill)| match fill {
                Some(mean) => col.into_iter().map(|v| Some(v.unwrap_or(*mean))).collect(),
                None => col,
            })
            .collect())
    }

    pub fn fit_transform(&mut self, columns: Vec<Vec<Option<f64>>>) -> Result<Vec<Vec<Option<f64>>>> {
        self.fit(&columns);
        self.transform(columns)
    }

    /// Fitted mean of a column
    pub fn fill_value(&self, column: usize) -> Option<f64> {
        self.fill_values.get(column).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_fill() {
        let columns = vec![
            vec![Some(1.0), None, Some(3.0)],
            vec![Some(4.0), Some(4.0), Some(4.0)],
        ];
        let mut imputer = MeanImputer::new();
        let filled = imputer.fit_transform(columns).unwrap();

        assert_eq!(filled[0], vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(filled[1], vec![Some(4.0); 3]);
    }

    #[test]
    fn test_all_missing_column_has_no_fill() {
        let mut imputer = MeanImputer::new();
        let filled = imputer.fit_transform(vec![vec![None, None]]).unwrap();
        assert_eq!(imputer.fill_value(0), None);
        assert_eq!(filled[0], vec![None, None]);
    }

    #[test]
    fn test_transform_before_fit() {
        let imputer = MeanImputer::new();
        assert!(matches!(imputer.transform(vec![]), Err(OncoriskError::ModelNotFitted)));
    }
}
