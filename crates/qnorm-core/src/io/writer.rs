//! CSV writer for normalized grids.
use std::io::Write;

use csv::{QuoteStyle, Terminator};

use crate::config::NormalizeConfig;
use crate::data_handling::Grid;
use crate::error::GridError;

/// Write every row of `grid` as `label,query_id,docno,f_1,...,f_k`.
///
/// The label is truncated toward zero and each feature is written in
/// fixed-point notation with `config.precision` fractional digits. Fields are
/// never quoted, so docnos come out exactly as they were read.
pub fn write_grid<W: Write>(
    grid: &Grid,
    writer: W,
    config: &NormalizeConfig,
) -> Result<(), GridError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for index in 0..grid.nrows() {
        let (meta, values) = grid.row(index);

        wtr.write_field((meta.label as i64).to_string())?;
        wtr.write_field(meta.query_id.to_string())?;
        wtr.write_field(&meta.docno)?;
        for value in values {
            wtr.write_field(format!("{:.*}", config.precision, value))?;
        }
        wtr.write_record(None::<&[u8]>)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::{GroupRange, RowMetadata};
    use crate::math::Array2;

    fn render(grid: &Grid, config: &NormalizeConfig) -> String {
        let mut out = Vec::new();
        write_grid(grid, &mut out, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn label_is_truncated_and_features_fixed_point() {
        let metadata = vec![RowMetadata {
            label: 2.9,
            query_id: 7,
            docno: "GX000-01".to_string(),
        }];
        let features = Array2::from_shape_vec((1, 2), vec![0.25, 1.0]).unwrap();
        let grid = Grid::from_parts(metadata, vec![GroupRange::new(0, 1)], features).unwrap();

        assert_eq!(
            render(&grid, &NormalizeConfig::default()),
            "2,7,GX000-01,0.250000,1.000000\n"
        );
    }

    #[test]
    fn negative_label_truncates_toward_zero() {
        let metadata = vec![RowMetadata {
            label: -1.5,
            query_id: 1,
            docno: "d".to_string(),
        }];
        let features = Array2::from_shape_vec((1, 1), vec![0.0]).unwrap();
        let grid = Grid::from_parts(metadata, vec![GroupRange::new(0, 1)], features).unwrap();

        assert_eq!(render(&grid, &NormalizeConfig::default()), "-1,1,d,0.000000\n");
    }

    #[test]
    fn precision_and_delimiter_follow_config() {
        let metadata = vec![RowMetadata {
            label: 0.0,
            query_id: 3,
            docno: "x".to_string(),
        }];
        let features = Array2::from_shape_vec((1, 1), vec![0.5]).unwrap();
        let grid = Grid::from_parts(metadata, vec![GroupRange::new(0, 1)], features).unwrap();
        let config = NormalizeConfig {
            delimiter: '\t',
            precision: 2,
            ..NormalizeConfig::default()
        };

        assert_eq!(render(&grid, &config), "0\t3\tx\t0.50\n");
    }

    #[test]
    fn empty_grid_writes_nothing() {
        assert_eq!(render(&Grid::empty(), &NormalizeConfig::default()), "");
    }
}
