//! Command-line interface for the Scoutline shortlist engine.
#![forbid(unsafe_code)]

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use scoutline_core::PositionGroup;
use scoutline_scorer::{MAX_TOP_N, MIN_TOP_N, ShortlistRequestError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod shortlist;

#[cfg(test)]
mod tests;

const ARG_ARTIFACT_DIR: &str = "artifact-dir";
const ARG_BIRTH_YEAR: &str = "birth-year";
const ARG_POSITION: &str = "position";
const ENV_ARTIFACT_DIR: &str = "SCOUTLINE_CMDS_SHORTLIST_ARTIFACT_DIR";
const ENV_BIRTH_YEAR: &str = "SCOUTLINE_CMDS_SHORTLIST_BIRTH_YEAR";
const ENV_POSITION: &str = "SCOUTLINE_CMDS_SHORTLIST_POSITION";

/// Shortlist length used when the caller does not ask for one.
const DEFAULT_TOP_N: usize = 10;

/// Run the Scoutline CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments fail to parse, configuration cannot
/// be merged, or the shortlist command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Shortlist(args) => {
            let config = args.into_config()?;
            config.validate_sources()?;
            shortlist::run_shortlist(&config)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "scoutline",
    about = "Player shortlist generation backed by trained embeddings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank comparable players for a birth year and position.
    Shortlist(ShortlistArgs),
}

/// CLI arguments for the `shortlist` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate a ranked shortlist from exported artifacts. \
                 Values can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Generate a ranked player shortlist"
)]
#[ortho_config(prefix = "SCOUTLINE")]
struct ShortlistArgs {
    /// Directory holding the exported artifact files.
    #[arg(long = ARG_ARTIFACT_DIR, value_name = "path")]
    #[serde(default)]
    artifact_dir: Option<PathBuf>,
    /// Birth year of the cohort to rank.
    #[arg(long = ARG_BIRTH_YEAR, value_name = "year")]
    #[serde(default)]
    birth_year: Option<i32>,
    /// Position group to shortlist: G, D, or F.
    #[arg(long = ARG_POSITION, value_name = "group")]
    #[serde(default)]
    position: Option<String>,
    /// Shortlist length (1 to 100, default 10).
    #[arg(long, value_name = "count")]
    #[serde(default)]
    top_n: Option<usize>,
    /// Write the JSON shortlist here instead of standard output.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    output: Option<PathBuf>,
}

impl ShortlistArgs {
    fn into_config(self) -> Result<ShortlistConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShortlistConfig::try_from(merged)
    }
}

/// Fully resolved shortlist invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShortlistConfig {
    artifact_dir: PathBuf,
    birth_year: i32,
    position: PositionGroup,
    top_n: usize,
    output: Option<PathBuf>,
}

impl ShortlistConfig {
    pub(crate) fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub(crate) fn birth_year(&self) -> i32 {
        self.birth_year
    }

    pub(crate) fn position(&self) -> PositionGroup {
        self.position
    }

    pub(crate) fn top_n(&self) -> usize {
        self.top_n
    }

    pub(crate) fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    fn validate_sources(&self) -> Result<(), CliError> {
        if self.artifact_dir.is_dir() {
            Ok(())
        } else {
            Err(CliError::MissingArtifactDir {
                path: self.artifact_dir.clone(),
            })
        }
    }
}

impl TryFrom<ShortlistArgs> for ShortlistConfig {
    type Error = CliError;

    fn try_from(args: ShortlistArgs) -> Result<Self, Self::Error> {
        let artifact_dir = args.artifact_dir.ok_or(CliError::MissingArgument {
            field: ARG_ARTIFACT_DIR,
            env: ENV_ARTIFACT_DIR,
        })?;
        let birth_year = args.birth_year.ok_or(CliError::MissingArgument {
            field: ARG_BIRTH_YEAR,
            env: ENV_BIRTH_YEAR,
        })?;
        let position = args.position.ok_or(CliError::MissingArgument {
            field: ARG_POSITION,
            env: ENV_POSITION,
        })?;
        let position = PositionGroup::from_str(&position)
            .map_err(|_| CliError::InvalidPosition { value: position })?;
        let top_n = args.top_n.unwrap_or(DEFAULT_TOP_N);
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&top_n) {
            return Err(CliError::Request(ShortlistRequestError::TopNOutOfRange {
                requested: top_n,
            }));
        }
        Ok(Self {
            artifact_dir,
            birth_year,
            position,
            top_n,
            output: args.output,
        })
    }
}

/// Errors emitted by the Scoutline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Missing CLI flag name.
        field: &'static str,
        /// Environment variable that also satisfies the option.
        env: &'static str,
    },
    /// The artifact directory does not exist or is not a directory.
    #[error("artifact directory {path:?} does not exist")]
    MissingArtifactDir {
        /// Offending path.
        path: PathBuf,
    },
    /// The artifact directory path is not valid Unicode.
    #[error("artifact directory {path:?} is not valid Unicode")]
    NonUnicodePath {
        /// Offending path.
        path: PathBuf,
    },
    /// The position flag named no known position group.
    #[error("invalid position '{value}' (expected G, D, or F)")]
    InvalidPosition {
        /// Rejected flag value.
        value: String,
    },
    /// The shortlist request failed validation.
    #[error(transparent)]
    Request(#[from] ShortlistRequestError),
    /// Artifact loading failed.
    #[error(transparent)]
    Load(#[from] scoutline_data::LoadError),
    /// The shortlist could not be serialised as JSON.
    #[error("failed to serialise the shortlist")]
    Serialise(#[source] serde_json::Error),
    /// The shortlist could not be written to the output file.
    #[error("failed to write shortlist to {path:?}")]
    WriteOutput {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
