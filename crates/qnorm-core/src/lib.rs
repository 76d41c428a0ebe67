//! qnorm-core: per-query min-max normalization of ranking feature files.
//!
//! Rows of the form `label,query_id,docno,f_1,...,f_k` are loaded into a
//! [`data_handling::Grid`] by a two-pass reader (size, then load), each
//! contiguous run of rows sharing a query id is rescaled column-wise to
//! `[0, 1]`, and the result is written back out in the same row layout.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod preprocessing;

pub use config::{NormalizeConfig, ShortRowPolicy, METADATA_COLUMN_COUNT};
pub use data_handling::{Grid, GroupRange, RowMetadata};
pub use error::GridError;
