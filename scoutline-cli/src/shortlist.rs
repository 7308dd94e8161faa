//! Execution of the `shortlist` subcommand.

use camino::Utf8PathBuf;
use log::info;
use scoutline_data::{ArtifactPaths, load_service_context};
use scoutline_scorer::{
    ShortlistOptions, ShortlistRequest, generate_shortlist,
};

use crate::{CliError, ShortlistConfig};

/// Load the artifacts, generate one shortlist, and emit it as JSON.
pub(crate) fn run_shortlist(config: &ShortlistConfig) -> Result<(), CliError> {
    let artifact_dir = Utf8PathBuf::from_path_buf(config.artifact_dir().to_path_buf())
        .map_err(|path| CliError::NonUnicodePath { path })?;
    let paths = ArtifactPaths::in_dir(&artifact_dir);
    let ctx = load_service_context(&paths)?;

    let request = ShortlistRequest::new(config.birth_year(), config.position(), config.top_n())?;
    let shortlist = generate_shortlist(&ctx, &request, &ShortlistOptions::default());
    info!(
        "shortlist for birth year {} position {} holds {} players",
        config.birth_year(),
        config.position(),
        shortlist.len()
    );

    let rendered = serde_json::to_string_pretty(&shortlist).map_err(CliError::Serialise)?;
    match config.output() {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|source| CliError::WriteOutput {
                path: path.to_path_buf(),
                source,
            })?;
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
