use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

use qnorm_core::config::{NormalizeConfig, ShortRowPolicy};

/// Everything needed for one normalization run.
#[derive(Debug, Clone)]
pub struct NormalizeRun {
    pub input: PathBuf,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub config: NormalizeConfig,
}

/// Load a `NormalizeConfig` from a JSON file. Missing keys take their defaults.
pub fn load_normalize_config<P: AsRef<Path>>(path: P) -> Result<NormalizeConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: NormalizeConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl NormalizeRun {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let input: PathBuf = matches
            .get_one::<PathBuf>("file")
            .cloned()
            .context("Missing input file argument")?;

        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(config_path) => {
                log::info!("[qnorm] Using config: {:?}", config_path);
                load_normalize_config(config_path)?
            }
            None => NormalizeConfig::default(),
        };

        // Apply CLI overrides
        if let Some(policy) = matches.get_one::<String>("short_rows") {
            config.short_rows = ShortRowPolicy::from_str(policy).map_err(anyhow::Error::msg)?;
        }
        config.validate()?;

        Ok(NormalizeRun {
            input,
            output: matches.get_one::<PathBuf>("output_file").cloned(),
            config,
        })
    }
}
