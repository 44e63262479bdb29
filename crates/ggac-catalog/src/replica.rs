use std::path::{Path, PathBuf};

use ggac_workflow::Artifact;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// Site every scanned input file is bound to.
pub const LOCAL_SITE: &str = "local";

/// Physical location of a pre-existing input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replica {
  pub lfn: String,
  pub site: String,
  pub pfn: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplicaCatalog {
  replicas: Vec<Replica>,
}

impl ReplicaCatalog {
  pub fn replicas(&self) -> &[Replica] {
    &self.replicas
  }

  pub fn len(&self) -> usize {
    self.replicas.len()
  }

  pub fn is_empty(&self) -> bool {
    self.replicas.is_empty()
  }

  pub fn contains(&self, lfn: &str) -> bool {
    self.replicas.iter().any(|r| r.lfn == lfn)
  }

  /// The replicas as workflow inputs, in catalog order.
  pub fn artifacts(&self) -> Vec<Artifact> {
    self
      .replicas
      .iter()
      .map(|r| Artifact::replica(r.lfn.clone()))
      .collect()
  }
}

/// Register every regular file in `input_dir` under its file name.
///
/// Entries are sorted by logical name so the catalog does not depend on
/// directory iteration order. Subdirectories and files whose names are not
/// valid UTF-8 are skipped.
pub async fn build_replica_catalog(input_dir: &Path) -> Result<ReplicaCatalog, CatalogError> {
  match fs::metadata(input_dir).await {
    Ok(meta) if meta.is_dir() => {}
    Ok(_) => return Err(CatalogError::MissingInputDirectory(input_dir.to_path_buf())),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(CatalogError::MissingInputDirectory(input_dir.to_path_buf()));
    }
    Err(e) => return Err(CatalogError::Io(e)),
  }

  let root = fs::canonicalize(input_dir).await?;
  let mut replicas = Vec::new();

  let mut entries = fs::read_dir(&root).await?;
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();
    // Follows symlinks; dangling ones are skipped like directories.
    if !fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
      continue;
    }

    let lfn = match entry.file_name().to_str() {
      Some(n) => n.to_string(),
      None => {
        warn!(path = %path.display(), "skipping input file with non UTF-8 name");
        continue;
      }
    };

    replicas.push(Replica {
      lfn,
      site: LOCAL_SITE.to_string(),
      pfn: path,
    });
  }

  replicas.sort_by(|a, b| a.lfn.cmp(&b.lfn));
  debug!(dir = %root.display(), replicas = replicas.len(), "scanned input directory");

  Ok(ReplicaCatalog { replicas })
}
