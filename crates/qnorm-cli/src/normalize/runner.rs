use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use qnorm_core::io::{load_grid, write_grid};
use qnorm_core::preprocessing::normalize_grid;

use crate::normalize::input::NormalizeRun;

/// Load, normalize and write one file.
///
/// Nothing is written until the whole input has been parsed and normalized,
/// so a malformed row never leaves partial output behind.
pub fn run_normalize(params: &NormalizeRun) -> Result<()> {
    let file = File::open(&params.input)
        .with_context(|| format!("Failed to open input file: {}", params.input.display()))?;

    let grid = load_grid(file, &params.config)
        .with_context(|| format!("Failed to load {}", params.input.display()))?;
    grid.log_input_data_summary();

    let grid = normalize_grid(grid).context("Failed to normalize query groups")?;

    match &params.output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_grid(&grid, BufWriter::new(out), &params.config)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = BufWriter::new(stdout.lock());
            write_grid(&grid, &mut handle, &params.config).context("Failed to write to stdout")?;
            handle.flush()?;
        }
    }
    Ok(())
}
