use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GridError;

/// Leading columns of every row that are not features: label, query id, docno.
pub const METADATA_COLUMN_COUNT: usize = 3;

/// What to do with a row that carries fewer feature fields than the first row.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShortRowPolicy {
    /// Missing trailing features are left at `0.0`.
    #[default]
    Lenient,
    /// Fail the load with `GridError::MalformedRow`.
    Reject,
}

impl FromStr for ShortRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(ShortRowPolicy::Lenient),
            "reject" => Ok(ShortRowPolicy::Reject),
            _ => Err(format!(
                "Unknown short row policy: {}. Expected 'lenient' or 'reject'",
                s
            )),
        }
    }
}

/// Settings shared by the loader and the writer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Field delimiter for both input and output.
    pub delimiter: char,
    /// Fractional digits written for each normalized feature.
    pub precision: usize,
    pub short_rows: ShortRowPolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            short_rows: ShortRowPolicy::Lenient,
        }
    }
}

impl NormalizeConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.delimiter.is_ascii() {
            return Err(GridError::InvalidConfig(format!(
                "delimiter {:?} is not an ASCII character",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '\n' | '\r') {
            return Err(GridError::InvalidConfig(
                "delimiter cannot be a line terminator".to_string(),
            ));
        }
        Ok(())
    }

    /// Delimiter as the single byte the csv reader and writer expect.
    pub fn delimiter_byte(&self) -> Result<u8, GridError> {
        self.validate()?;
        Ok(self.delimiter as u8)
    }
}
