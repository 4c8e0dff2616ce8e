use std::io;
use std::path::PathBuf;

use itertools::Itertools;


/// Errors surfaced to callers.
///
/// Transport failures never appear here: they are logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// None of the candidate configuration files exist
    #[error("statsd configuration not found, searched: {}", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    /// A configuration file exists but could not be read
    #[error("failed to read statsd configuration {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file is not valid YAML for `Config`
    #[error("failed to parse statsd configuration {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|path| path.display()).join(", ")
}
