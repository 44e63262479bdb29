use std::path::PathBuf;

use thiserror::Error;

use crate::site::SiteRole;

/// Configuration errors detected while building catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
  /// Input directory does not exist or is not a directory.
  #[error("missing input directory: {}", .0.display())]
  MissingInputDirectory(PathBuf),

  /// Two sites share a name.
  #[error("duplicate site: {0}")]
  DuplicateSite(String),

  /// A shared-scratch directory is not reachable through any file server.
  #[error("site '{site}': shared scratch {} has no file server", .path.display())]
  MissingFileServer { site: String, path: PathBuf },

  /// File-server URL cannot be parsed into scheme and path.
  #[error("site '{site}': malformed file server url '{url}'")]
  MalformedFileServerUrl { site: String, url: String },

  /// File-server URL serves a different path than its directory.
  #[error("site '{site}': file server '{url}' does not serve {}", .path.display())]
  FileServerPathMismatch {
    site: String,
    url: String,
    path: PathBuf,
  },

  /// Site referenced by the submission is not in the catalog.
  #[error("{role} site '{name}' is not in the site catalog")]
  UnknownSite { role: SiteRole, name: String },

  /// Same transformation name registered with different executables.
  #[error(
    "transformation '{name}' registered twice: {} and {}",
    .existing.display(),
    .conflicting.display()
  )]
  ConflictingTransformation {
    name: String,
    existing: PathBuf,
    conflicting: PathBuf,
  },

  /// Transformation referenced by a stage is not in the catalog.
  #[error("transformation not found: {0}")]
  TransformationNotFound(String),

  /// An I/O error occurred while scanning inputs.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
