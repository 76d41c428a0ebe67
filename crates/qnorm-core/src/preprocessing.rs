//! Per-query min-max scaling of the feature matrix.
//!
//! Every group is fit and transformed independently: extrema are seeded from
//! the group's own first row, so values never leak across query boundaries.
//! A column that is constant within a group maps to `0.0` for every row of
//! that group.

use crate::data_handling::{Grid, GroupRange};
use crate::error::GridError;
use crate::math::Array2;

/// Per-column minimum and maximum over one group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupExtrema {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl GroupExtrema {
    /// Width of the column, or `0.0` when the column is constant.
    pub fn span(&self, col: usize) -> f64 {
        self.max[col] - self.min[col]
    }
}

fn check_range(x: &Array2<f64>, range: GroupRange) -> Result<(), GridError> {
    if range.is_empty() {
        return Err(GridError::InvalidGroups(format!(
            "range {}..{} is empty",
            range.start, range.end
        )));
    }
    if range.end > x.nrows() {
        return Err(GridError::InvalidGroups(format!(
            "range {}..{} ends past the last row {}",
            range.start,
            range.end,
            x.nrows()
        )));
    }
    Ok(())
}

/// Fit `GroupExtrema` over rows `range.start..range.end` of `x`.
pub fn fit_group_extrema(x: &Array2<f64>, range: GroupRange) -> Result<GroupExtrema, GridError> {
    check_range(x, range)?;

    let first = x.row_slice(range.start);
    let mut min = first.to_vec();
    let mut max = first.to_vec();

    for r in range.start + 1..range.end {
        for (c, &v) in x.row_slice(r).iter().enumerate() {
            if v > max[c] {
                max[c] = v;
            }
            if v < min[c] {
                min[c] = v;
            }
        }
    }

    Ok(GroupExtrema { min, max })
}

/// Rescale rows of `range` in place using previously fitted extrema.
pub fn transform_group(
    x: &mut Array2<f64>,
    range: GroupRange,
    extrema: &GroupExtrema,
) -> Result<(), GridError> {
    check_range(x, range)?;
    for found in [extrema.min.len(), extrema.max.len()] {
        if found != x.ncols() {
            return Err(GridError::WidthMismatch {
                expected: x.ncols(),
                found,
            });
        }
    }

    for r in range.as_range() {
        for (c, v) in x.row_slice_mut(r).iter_mut().enumerate() {
            if extrema.max[c] == extrema.min[c] {
                *v = 0.0;
            } else {
                *v = (*v - extrema.min[c]) / extrema.span(c);
            }
        }
    }
    Ok(())
}

/// Fit and transform every group of `grid`.
pub fn normalize_groups(grid: &mut Grid) -> Result<(), GridError> {
    for group in grid.groups.iter().copied() {
        let extrema = fit_group_extrema(&grid.features, group)?;
        transform_group(&mut grid.features, group, &extrema)?;
    }
    log::debug!("Normalized {} query groups", grid.ngroups());
    Ok(())
}

/// Consume a loaded grid and return it normalized.
pub fn normalize_grid(mut grid: Grid) -> Result<Grid, GridError> {
    normalize_groups(&mut grid)?;
    Ok(grid)
}
