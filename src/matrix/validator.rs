//! Structural checks on inbound grids.
//!
//! Shape and size are independent checks. Callers run `validate_shape` first;
//! `validate_size` only looks at the first row for the column count.

use thiserror::Error;

use crate::matrix::Grid;

/// The grid is not a non-empty rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("matrix must not be empty")]
    EmptyGrid,

    #[error("matrix rows must not be empty")]
    EmptyRow,

    #[error("matrix must be rectangular: row {row} has length {found}, expected {expected}")]
    NonRectangular {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// The grid exceeds the configured bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("matrix has too many rows: {rows} (max: {max})")]
    TooManyRows { rows: usize, max: usize },

    #[error("matrix has too many columns: {cols} (max: {max})")]
    TooManyColumns { cols: usize, max: usize },
}

/// Reject empty or ragged grids.
pub fn validate_shape(grid: &Grid) -> Result<(), ShapeError> {
    let first = grid.first().ok_or(ShapeError::EmptyGrid)?;
    let expected = first.len();
    if expected == 0 {
        return Err(ShapeError::EmptyRow);
    }

    for (row, values) in grid.iter().enumerate() {
        if values.len() != expected {
            return Err(ShapeError::NonRectangular {
                row,
                found: values.len(),
                expected,
            });
        }
    }

    Ok(())
}

/// Reject grids larger than `max_rows` × `max_cols`.
pub fn validate_size(grid: &Grid, max_rows: usize, max_cols: usize) -> Result<(), SizeError> {
    if grid.len() > max_rows {
        return Err(SizeError::TooManyRows {
            rows: grid.len(),
            max: max_rows,
        });
    }

    if let Some(first) = grid.first() {
        if first.len() > max_cols {
            return Err(SizeError::TooManyColumns {
                cols: first.len(),
                max: max_cols,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_rejected() {
        assert_eq!(validate_shape(&vec![]), Err(ShapeError::EmptyGrid));
    }

    #[test]
    fn empty_first_row_rejected() {
        assert_eq!(validate_shape(&vec![vec![], vec![1]]), Err(ShapeError::EmptyRow));
    }

    #[test]
    fn ragged_grid_reports_offending_row() {
        let err = validate_shape(&vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::NonRectangular {
                row: 1,
                found: 1,
                expected: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "matrix must be rectangular: row 1 has length 1, expected 2"
        );
    }

    #[test]
    fn rectangular_grids_accepted() {
        assert!(validate_shape(&vec![vec![1, 2], vec![3, 4]]).is_ok());
        assert!(validate_shape(&vec![vec![1, 2, 3]]).is_ok());
        assert!(validate_shape(&vec![vec![1], vec![2], vec![3]]).is_ok());
    }

    #[test]
    fn too_many_rows() {
        let grid = vec![vec![0]; 11];
        assert_eq!(
            validate_size(&grid, 10, 10),
            Err(SizeError::TooManyRows { rows: 11, max: 10 })
        );
    }

    #[test]
    fn too_many_columns() {
        let grid = vec![vec![0; 11]];
        assert_eq!(
            validate_size(&grid, 10, 10),
            Err(SizeError::TooManyColumns { cols: 11, max: 10 })
        );
    }

    #[test]
    fn size_at_bounds_accepted() {
        let grid = vec![vec![0; 10]; 10];
        assert!(validate_size(&grid, 10, 10).is_ok());
        assert!(validate_size(&vec![], 10, 10).is_ok());
    }
}
