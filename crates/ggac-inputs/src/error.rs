use std::path::PathBuf;

use thiserror::Error;

/// A parameter file that could not be written.
#[derive(Debug, Error)]
pub enum InputFileError {
  /// Output directory does not exist.
  #[error("input directory does not exist: {}", .0.display())]
  MissingDirectory(PathBuf),

  /// Writing a file failed.
  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
