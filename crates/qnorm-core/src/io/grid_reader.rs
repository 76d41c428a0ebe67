//! Two-pass loader for `label,query_id,docno,f_1,...,f_k` files.
//!
//! The first pass only measures the input (rows, fields of the first row,
//! number of query groups) so the grid can be allocated once at its final
//! size. The second pass rewinds the source and fills that grid. Both passes
//! share `scan_rows`, which tokenizes each record and tracks group changes.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use csv::StringRecord;

use crate::config::{NormalizeConfig, ShortRowPolicy, METADATA_COLUMN_COUNT};
use crate::data_handling::{Grid, GroupRange, RowMetadata};
use crate::error::GridError;

/// Dimensions measured by the sizing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridShape {
    pub rows: usize,
    /// Field count of the first row, metadata columns included.
    pub fields: usize,
    pub groups: usize,
}

impl GridShape {
    pub fn feature_columns(&self) -> usize {
        self.fields.saturating_sub(METADATA_COLUMN_COUNT)
    }
}

/// One tokenized input row as seen by a `RowVisitor`.
struct RowFields<'r> {
    index: usize,
    line: u64,
    query_id: i32,
    /// `true` when this row's query id differs from the previous row's.
    new_group: bool,
    record: &'r StringRecord,
}

impl<'r> RowFields<'r> {
    fn label(&self) -> Result<f64, GridError> {
        let raw = self
            .record
            .get(0)
            .ok_or(GridError::MissingLabel { line: self.line })?;
        parse_number(raw, self.line, 0)
    }

    fn docno(&self) -> Result<&'r str, GridError> {
        self.record
            .get(2)
            .ok_or(GridError::MissingDocno { line: self.line })
    }

    fn feature_count(&self) -> usize {
        self.record.len().saturating_sub(METADATA_COLUMN_COUNT)
    }

    fn features(&self) -> impl Iterator<Item = &'r str> {
        self.record.iter().skip(METADATA_COLUMN_COUNT)
    }
}

trait RowVisitor {
    fn visit(&mut self, row: RowFields<'_>) -> Result<(), GridError>;
}

/// Measure mode: counts rows and groups, records the first row's width.
#[derive(Default)]
struct Sizing {
    shape: GridShape,
}

impl RowVisitor for Sizing {
    fn visit(&mut self, row: RowFields<'_>) -> Result<(), GridError> {
        if row.index == 0 {
            self.shape.fields = row.record.len();
        }
        if row.new_group {
            self.shape.groups += 1;
        }
        self.shape.rows += 1;
        Ok(())
    }
}

/// Collect mode: writes each row into a grid preallocated from a `GridShape`.
struct Collector<'g> {
    grid: &'g mut Grid,
    cols: usize,
    policy: ShortRowPolicy,
    short_rows: usize,
}

impl<'g> Collector<'g> {
    fn new(grid: &'g mut Grid, policy: ShortRowPolicy) -> Self {
        let cols = grid.ncols();
        Self {
            grid,
            cols,
            policy,
            short_rows: 0,
        }
    }

    /// Close the last open group and check the pass saw as many rows as sized.
    fn finish(self) -> Result<usize, GridError> {
        let rows = self.grid.metadata.len();
        if rows != self.grid.features.nrows() {
            return Err(changed_between_passes());
        }
        if let Some(last) = self.grid.groups.last_mut() {
            last.end = rows;
        }
        Ok(self.short_rows)
    }
}

impl RowVisitor for Collector<'_> {
    fn visit(&mut self, row: RowFields<'_>) -> Result<(), GridError> {
        if row.index >= self.grid.features.nrows() {
            return Err(changed_between_passes());
        }

        let label = row.label()?;
        let docno = row.docno()?.to_string();

        let found = row.feature_count();
        if found > self.cols || (found < self.cols && self.policy == ShortRowPolicy::Reject) {
            return Err(GridError::MalformedRow {
                line: row.line,
                expected: self.cols,
                found,
            });
        }
        if found < self.cols {
            log::debug!(
                "Line {} has {} of {} feature fields; remaining values left at 0",
                row.line,
                found,
                self.cols
            );
            self.short_rows += 1;
        }

        let values = self.grid.features.row_slice_mut(row.index);
        for (j, raw) in row.features().enumerate() {
            values[j] = parse_number(raw, row.line, METADATA_COLUMN_COUNT + j)?;
        }

        if row.new_group {
            if let Some(previous) = self.grid.groups.last_mut() {
                previous.end = row.index;
            }
            self.grid.groups.push(GroupRange::new(row.index, row.index));
        }

        self.grid.metadata.push(RowMetadata {
            label,
            query_id: row.query_id,
            docno,
        });
        Ok(())
    }
}

fn changed_between_passes() -> GridError {
    GridError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "input changed between sizing and load passes",
    ))
}

fn parse_number<T: std::str::FromStr>(raw: &str, line: u64, column: usize) -> Result<T, GridError> {
    raw.trim().parse::<T>().map_err(|_| GridError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    })
}

/// Split one input line into `record`, dropping its `\n` / `\r\n` terminator.
///
/// An empty line becomes a record with a single empty field.
fn split_fields(line: &str, delimiter: char, record: &mut StringRecord) {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    record.clear();
    for field in line.split(delimiter) {
        record.push_field(field);
    }
}

/// Tokenize every line of `source` and hand it to `visitor`.
///
/// Every line is a row: blank lines are not skipped and fail for lack of a
/// query id. Rows must carry a label, a query id and a docno; the query id is
/// parsed here so both passes agree on where groups begin.
fn scan_rows<R: Read, V: RowVisitor>(
    source: R,
    delimiter: u8,
    visitor: &mut V,
) -> Result<(), GridError> {
    let mut reader = BufReader::new(source);
    let delimiter = char::from(delimiter);

    let mut buf = String::new();
    let mut record = StringRecord::new();
    let mut previous_id: Option<i32> = None;
    let mut index = 0usize;

    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let line = index as u64 + 1;
        split_fields(&buf, delimiter, &mut record);

        if record.get(0).is_none() {
            return Err(GridError::MissingLabel { line });
        }
        let raw_id = record.get(1).ok_or(GridError::MissingQueryId { line })?;
        let query_id: i32 = parse_number(raw_id, line, 1)?;
        if record.get(2).is_none() {
            return Err(GridError::MissingDocno { line });
        }

        let new_group = previous_id != Some(query_id);
        previous_id = Some(query_id);

        visitor.visit(RowFields {
            index,
            line,
            query_id,
            new_group,
            record: &record,
        })?;
        index += 1;
    }
    Ok(())
}

/// Loads a `Grid` from a seekable source in two passes.
pub struct GridLoader<R> {
    source: R,
    config: NormalizeConfig,
}

impl<R: Read + Seek> GridLoader<R> {
    pub fn new(source: R, config: &NormalizeConfig) -> Self {
        Self {
            source,
            config: config.clone(),
        }
    }

    /// Sizing pass: measure the input from its start without storing rows.
    pub fn size(&mut self) -> Result<GridShape, GridError> {
        let delimiter = self.config.delimiter_byte()?;
        self.source.seek(SeekFrom::Start(0))?;
        let mut sizing = Sizing::default();
        scan_rows(&mut self.source, delimiter, &mut sizing)?;
        Ok(sizing.shape)
    }

    /// Run the sizing pass, allocate the grid, then rewind and fill it.
    pub fn load(mut self) -> Result<Grid, GridError> {
        let shape = self.size()?;
        log::debug!(
            "rows: {}, fields: {}, groups: {}",
            shape.rows,
            shape.fields,
            shape.groups
        );
        if shape.rows == 0 {
            return Ok(Grid::empty());
        }

        let mut grid = Grid::with_capacity(shape.rows, shape.feature_columns(), shape.groups)?;

        let delimiter = self.config.delimiter_byte()?;
        self.source.seek(SeekFrom::Start(0))?;
        let mut collector = Collector::new(&mut grid, self.config.short_rows);
        scan_rows(&mut self.source, delimiter, &mut collector)?;
        let short_rows = collector.finish()?;

        if short_rows > 0 {
            log::warn!(
                "{} rows had fewer than {} feature fields; missing values were set to 0",
                short_rows,
                shape.feature_columns()
            );
        }
        Ok(grid)
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Load a grid from any seekable reader.
pub fn load_grid<R: Read + Seek>(source: R, config: &NormalizeConfig) -> Result<Grid, GridError> {
    GridLoader::new(source, config).load()
}

/// Open `path` and load it as a grid.
pub fn load_grid_from_path<P: AsRef<Path>>(
    path: P,
    config: &NormalizeConfig,
) -> Result<Grid, GridError> {
    let file = File::open(path.as_ref())?;
    load_grid(file, config)
}
