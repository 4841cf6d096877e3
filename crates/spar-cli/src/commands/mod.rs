//! Subcommands

pub mod analyze;
pub mod ledger;

use crate::{config::Config, CliError};
use std::path::PathBuf;

/// Resolve the data directory from a flag or the configuration
pub(crate) fn data_dir(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf, CliError> {
    flag.or_else(|| config.data_dir.clone()).ok_or_else(|| {
        CliError::Config(
            "no data directory; pass --data-dir or run `spar config --set-data-dir DIR`"
                .to_string(),
        )
    })
}
