//! 90° clockwise rotation.

use crate::matrix::Grid;

/// Rotate an R×C grid into a new C×R grid.
///
/// `output[j][R-1-i] = input[i][j]`. The input is borrowed and left untouched
/// because the pipeline forwards it to the peer alongside the result.
/// A grid with no rows (or an empty first row) is returned as-is.
pub fn rotate_clockwise(grid: &Grid) -> Grid {
    let rows = grid.len();
    let cols = match grid.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return grid.clone(),
    };

    let mut rotated = vec![vec![0; rows]; cols];
    for (i, row) in grid.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            rotated[j][rows - 1 - i] = value;
        }
    }
    rotated
}
