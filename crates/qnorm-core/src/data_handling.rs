//! In-memory representation of a loaded feature file.
//!
//! A `Grid` owns one `RowMetadata` per input row, the row-major feature
//! matrix, and the list of `GroupRange`s that partition the rows into
//! contiguous per-query blocks. All three share the same row indexing.
use std::ops::Range;

use crate::error::GridError;
use crate::math::Array2;

#[derive(Debug, Clone, PartialEq)]
pub struct RowMetadata {
    /// Relevance label; stored as read, truncated only when written out.
    pub label: f64,
    pub query_id: i32,
    /// Document identifier
    pub docno: String,
}

/// Half-open row interval `[start, end)` covering one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRange {
    pub start: usize,
    pub end: usize,
}

impl GroupRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub(crate) metadata: Vec<RowMetadata>,
    pub(crate) groups: Vec<GroupRange>,
    pub(crate) features: Array2<f64>,
}

impl Grid {
    /// Grid with no rows, no feature columns and no groups.
    pub fn empty() -> Self {
        Grid {
            metadata: Vec::new(),
            groups: Vec::new(),
            features: Array2::empty(),
        }
    }

    /// Allocate storage for `rows x cols` features and `groups` ranges.
    ///
    /// The feature matrix is zero-filled; metadata and groups start empty with
    /// exactly the requested capacity.
    pub(crate) fn with_capacity(rows: usize, cols: usize, groups: usize) -> Result<Self, GridError> {
        let mut metadata = Vec::new();
        metadata
            .try_reserve_exact(rows)
            .map_err(|_| GridError::Allocation {
                what: "row metadata",
                requested: rows,
            })?;

        let mut ranges = Vec::new();
        ranges
            .try_reserve_exact(groups)
            .map_err(|_| GridError::Allocation {
                what: "group ranges",
                requested: groups,
            })?;

        let cells = rows.checked_mul(cols).ok_or(GridError::Allocation {
            what: "feature matrix",
            requested: usize::MAX,
        })?;
        let mut scores = Vec::new();
        scores
            .try_reserve_exact(cells)
            .map_err(|_| GridError::Allocation {
                what: "feature matrix",
                requested: cells,
            })?;
        scores.resize(cells, 0.0);

        let features = Array2::from_shape_vec((rows, cols), scores).map_err(|_| {
            GridError::Allocation {
                what: "feature matrix",
                requested: cells,
            }
        })?;

        Ok(Grid {
            metadata,
            groups: ranges,
            features,
        })
    }

    /// Assemble a grid from already-built parts, checking that row counts
    /// agree and that `groups` partitions the rows into single-query blocks.
    pub fn from_parts(
        metadata: Vec<RowMetadata>,
        groups: Vec<GroupRange>,
        features: Array2<f64>,
    ) -> Result<Self, GridError> {
        if metadata.len() != features.nrows() {
            return Err(GridError::ShapeMismatch {
                metadata_rows: metadata.len(),
                feature_rows: features.nrows(),
            });
        }
        validate_groups(&groups, &metadata)?;
        Ok(Grid {
            metadata,
            groups,
            features,
        })
    }

    pub fn nrows(&self) -> usize {
        self.metadata.len()
    }

    /// Number of feature columns (metadata columns excluded).
    pub fn ncols(&self) -> usize {
        self.features.ncols()
    }

    pub fn ngroups(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn metadata(&self) -> &[RowMetadata] {
        &self.metadata
    }

    pub fn groups(&self) -> &[GroupRange] {
        &self.groups
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Metadata and feature values of one row.
    pub fn row(&self, index: usize) -> (&RowMetadata, &[f64]) {
        (&self.metadata[index], self.features.row_slice(index))
    }

    pub fn log_input_data_summary(&self) {
        log::info!(
            "Loaded {} rows across {} queries with {} feature columns",
            self.nrows(),
            self.ngroups(),
            self.ncols()
        );
    }
}

fn validate_groups(groups: &[GroupRange], metadata: &[RowMetadata]) -> Result<(), GridError> {
    let mut expected_start = 0;
    for (i, group) in groups.iter().enumerate() {
        if group.start != expected_start {
            return Err(GridError::InvalidGroups(format!(
                "group {} starts at row {} but previous group ended at row {}",
                i, group.start, expected_start
            )));
        }
        if group.is_empty() {
            return Err(GridError::InvalidGroups(format!("group {} is empty", i)));
        }
        if group.end > metadata.len() {
            return Err(GridError::InvalidGroups(format!(
                "group {} ends at row {} past the last row {}",
                i,
                group.end,
                metadata.len()
            )));
        }
        let query_id = metadata[group.start].query_id;
        if let Some(row) = metadata[group.as_range()]
            .iter()
            .position(|m| m.query_id != query_id)
        {
            return Err(GridError::InvalidGroups(format!(
                "group {} mixes query ids {} and {}",
                i,
                query_id,
                metadata[group.start + row].query_id
            )));
        }
        expected_start = group.end;
    }
    if expected_start != metadata.len() {
        return Err(GridError::InvalidGroups(format!(
            "groups cover {} of {} rows",
            expected_start,
            metadata.len()
        )));
    }
    Ok(())
}
