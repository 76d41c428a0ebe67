//! Integration tests for per-query min-max normalization.

use std::io::Cursor;

use qnorm_core::io::{load_grid, write_grid};
use qnorm_core::math::Array2;
use qnorm_core::preprocessing::{normalize_grid, normalize_groups};
use qnorm_core::{Grid, GroupRange, NormalizeConfig, RowMetadata};

fn normalized(input: &str) -> Grid {
    let grid = load_grid(Cursor::new(input.as_bytes()), &NormalizeConfig::default()).unwrap();
    normalize_grid(grid).unwrap()
}

fn render(grid: &Grid) -> String {
    let mut out = Vec::new();
    write_grid(grid, &mut out, &NormalizeConfig::default()).unwrap();
    String::from_utf8(out).unwrap()
}

const MIXED: &str = "\
2,1,a,3.5,10,-1,4
1,1,b,0.5,10,-3,4
0,1,c,2.0,10,-2,4
1,2,d,100,1,1,0
0,2,e,-100,2,1,0
3,3,f,9,9,9,9
";

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn two_group_scenario_matches_expected_output() {
    let grid = normalized("1,10,d1,5,1\n0,10,d2,10,2\n1,11,d3,3,3\n");
    assert_eq!(
        render(&grid),
        "1,10,d1,0.000000,0.000000\n0,10,d2,1.000000,1.000000\n1,11,d3,0.000000,0.000000\n"
    );
}

#[test]
fn single_row_group_is_all_zero() {
    let grid = normalized("4,8,only,12.5,-3,0.001\n");
    assert_eq!(grid.row(0).1, &[0.0, 0.0, 0.0]);
}

#[test]
fn output_preserves_row_count_and_order() {
    let grid = normalized(MIXED);
    let out = render(&grid);
    let docnos: Vec<&str> = out
        .lines()
        .map(|l| l.split(',').nth(2).unwrap())
        .collect();
    assert_eq!(docnos, vec!["a", "b", "c", "d", "e", "f"]);
}

// ---------------------------------------------------------------------------
// Per-group properties
// ---------------------------------------------------------------------------

#[test]
fn each_group_column_spans_zero_to_one_or_is_constant_zero() {
    let original = load_grid(Cursor::new(MIXED.as_bytes()), &NormalizeConfig::default()).unwrap();
    let grid = normalize_grid(original.clone()).unwrap();

    for group in grid.groups() {
        for c in 0..grid.ncols() {
            let before: Vec<f64> = group
                .as_range()
                .map(|r| original.features().row_slice(r)[c])
                .collect();
            let after: Vec<f64> = group
                .as_range()
                .map(|r| grid.features().row_slice(r)[c])
                .collect();

            let constant = before.iter().all(|&v| v == before[0]);
            if constant {
                assert!(after.iter().all(|&v| v == 0.0), "constant column must be 0");
            } else {
                assert!(after.iter().all(|&v| (0.0..=1.0).contains(&v)));
                assert!(after.iter().any(|&v| v == 0.0));
                assert!(after.iter().any(|&v| v == 1.0));
            }
        }
    }
}

#[test]
fn groups_are_scaled_independently() {
    let grid = normalized(MIXED);
    // column 0: group 1 is {3.5, 0.5, 2.0}, group 2 is {100, -100}
    let column: Vec<f64> = (0..5).map(|r| grid.features().row_slice(r)[0]).collect();
    assert_eq!(column, vec![1.0, 0.0, 0.5, 1.0, 0.0]);
}

#[test]
fn renormalizing_is_idempotent() {
    let once = normalized(MIXED);
    let mut twice = once.clone();
    normalize_groups(&mut twice).unwrap();
    assert_eq!(once.features().as_slice(), twice.features().as_slice());
}

#[test]
fn grid_built_from_parts_normalizes_per_range() {
    let metadata = (0..4)
        .map(|i| RowMetadata {
            label: 0.0,
            query_id: if i < 2 { 1 } else { 2 },
            docno: format!("d{}", i),
        })
        .collect();
    let features = Array2::from_shape_vec((4, 1), vec![2.0, 4.0, 10.0, 30.0]).unwrap();
    let mut grid = Grid::from_parts(
        metadata,
        vec![GroupRange::new(0, 2), GroupRange::new(2, 4)],
        features,
    )
    .unwrap();

    normalize_groups(&mut grid).unwrap();
    assert_eq!(grid.features().as_slice(), &[0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn empty_grid_normalizes_to_nothing() {
    let grid = normalize_grid(Grid::empty()).unwrap();
    assert!(grid.is_empty());
    assert_eq!(render(&grid), "");
}
