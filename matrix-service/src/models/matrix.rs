//! Matrix input validation.
//!
//! A [`Matrix`] can only be obtained through validation, so holding one
//! guarantees it is non-empty, rectangular and made of finite numbers.

use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix must be a non-empty array")]
    NotANonEmptyArray,

    #[error("matrix cannot have empty columns")]
    EmptyColumns,

    #[error("all rows must have the same number of columns")]
    RaggedRows,

    #[error("invalid value at position [{row}][{col}]")]
    InvalidValue { row: usize, col: usize },
}

/// Validated matrix. Cells keep the number text the client sent, so `1`
/// echoes back as `1` rather than `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Matrix(Vec<Vec<Number>>);

impl Matrix {
    /// Validate typed rows.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let cols = match rows.first() {
            None => return Err(MatrixError::NotANonEmptyArray),
            Some(first) => first.len(),
        };
        if cols == 0 {
            return Err(MatrixError::EmptyColumns);
        }

        let mut parsed = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::RaggedRows);
            }
            let mut parsed_row = Vec::with_capacity(cols);
            for (j, cell) in row.iter().enumerate() {
                // `from_f64` refuses NaN and the infinities.
                match Number::from_f64(*cell) {
                    Some(n) => parsed_row.push(n),
                    None => return Err(MatrixError::InvalidValue { row: i, col: j }),
                }
            }
            parsed.push(parsed_row);
        }

        Ok(Self(parsed))
    }

    /// Validate an arbitrary JSON value as received from a client.
    ///
    /// Checks run row by row: a ragged row is reported before a bad cell in a
    /// later row, but after a bad cell in an earlier one.
    pub fn from_json(value: &Value) -> Result<Self, MatrixError> {
        let rows = match value.as_array() {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Err(MatrixError::NotANonEmptyArray),
        };

        let cols = match rows[0].as_array() {
            Some(first) if first.is_empty() => return Err(MatrixError::EmptyColumns),
            Some(first) => first.len(),
            // A non-array first row has no usable column count.
            None => return Err(MatrixError::RaggedRows),
        };

        let mut parsed = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let cells = match row.as_array() {
                Some(cells) if cells.len() == cols => cells,
                _ => return Err(MatrixError::RaggedRows),
            };

            let mut parsed_row = Vec::with_capacity(cols);
            for (j, cell) in cells.iter().enumerate() {
                match cell {
                    // Literals such as `1e400` overflow to infinity here.
                    Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => {
                        parsed_row.push(n.clone());
                    }
                    _ => return Err(MatrixError::InvalidValue { row: i, col: j }),
                }
            }
            parsed.push(parsed_row);
        }

        Ok(Self(parsed))
    }

    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn cols(&self) -> usize {
        self.0[0].len()
    }

    /// Compact JSON form embedded in prompts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_rectangular_finite_matrix() {
        let matrix = Matrix::from_json(&json!([[1, 2, 3], [4.5, -5, 6e2]])).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.to_json(), "[[1,2,3],[4.5,-5,600.0]]");
    }

    #[test]
    fn test_rejects_non_arrays_and_empty() {
        for value in [
            json!(null),
            json!("[[1]]"),
            json!(42),
            json!({"rows": [[1]]}),
            json!([]),
        ] {
            assert_eq!(
                Matrix::from_json(&value),
                Err(MatrixError::NotANonEmptyArray),
                "value: {value}"
            );
        }
    }

    #[test]
    fn test_rejects_empty_columns() {
        assert_eq!(
            Matrix::from_json(&json!([[], []])),
            Err(MatrixError::EmptyColumns)
        );
        assert_eq!(Matrix::new(vec![vec![]]), Err(MatrixError::EmptyColumns));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let cases = [
            json!([[1, 2], [3]]),
            json!([[1], [2, 3]]),
            json!([[1, 2], [3, 4], [5, 6, 7]]),
            json!([[1, 2], 3]),
            json!([1, 2]),
        ];
        for value in cases {
            assert_eq!(
                Matrix::from_json(&value),
                Err(MatrixError::RaggedRows),
                "value: {value}"
            );
        }
        assert_eq!(
            Matrix::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(MatrixError::RaggedRows)
        );
    }

    #[test]
    fn test_rejects_non_numeric_cells_with_position() {
        assert_eq!(
            Matrix::from_json(&json!([[1, 2], [3, "4"]])),
            Err(MatrixError::InvalidValue { row: 1, col: 1 })
        );
        assert_eq!(
            Matrix::from_json(&json!([[null, 2]])),
            Err(MatrixError::InvalidValue { row: 0, col: 0 })
        );
        assert_eq!(
            Matrix::from_json(&json!([[1, true]])),
            Err(MatrixError::InvalidValue { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_rejects_nan_and_infinity() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                Matrix::new(vec![vec![1.0, 2.0], vec![3.0, bad]]),
                Err(MatrixError::InvalidValue { row: 1, col: 1 })
            );
        }
    }

    #[test]
    fn test_rejects_literals_that_overflow_to_infinity() {
        let value: Value = serde_json::from_str("[[1, 2], [3, 1e400]]").unwrap();
        assert_eq!(
            Matrix::from_json(&value),
            Err(MatrixError::InvalidValue { row: 1, col: 1 })
        );

        let value: Value = serde_json::from_str("[[-1e400]]").unwrap();
        assert_eq!(
            Matrix::from_json(&value),
            Err(MatrixError::InvalidValue { row: 0, col: 0 })
        );
    }

    #[test]
    fn test_integers_keep_their_form() {
        let value: Value = serde_json::from_str("[[1, 2], [3, 4]]").unwrap();
        let matrix = Matrix::from_json(&value).unwrap();
        assert_eq!(matrix.to_json(), "[[1,2],[3,4]]");
        assert_eq!(serde_json::to_value(&matrix).unwrap(), value);
    }

    #[test]
    fn test_error_messages_are_readable() {
        assert_eq!(
            MatrixError::InvalidValue { row: 0, col: 2 }.to_string(),
            "invalid value at position [0][2]"
        );
    }

    #[test]
    fn test_to_json_is_compact() {
        let matrix = Matrix::new(vec![vec![1.0, 0.5], vec![-2.0, 3.0]]).unwrap();
        assert_eq!(matrix.to_json(), "[[1.0,0.5],[-2.0,3.0]]");
    }
}
