use std::path::PathBuf;

use ggac_config::{Arch, Profile, StageDef};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// A named executable, shared by every task that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
  pub name: String,
  /// Site the executable lives on.
  pub site: String,
  pub pfn: PathBuf,
  pub is_stageable: bool,
  pub arch: Arch,
  pub profiles: Vec<Profile>,
}

impl Transformation {
  pub fn new(name: impl Into<String>, site: impl Into<String>, pfn: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      site: site.into(),
      pfn: pfn.into(),
      is_stageable: true,
      arch: Arch::default(),
      profiles: Vec::new(),
    }
  }

  /// Transformation for a stage, with its executable already resolved.
  pub fn for_stage(stage: &StageDef, pfn: PathBuf) -> Self {
    Self {
      name: stage.transformation.clone(),
      site: stage.host_site.clone(),
      pfn,
      is_stageable: true,
      arch: stage.arch,
      profiles: stage.profiles.clone(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformationCatalog {
  transformations: Vec<Transformation>,
}

impl TransformationCatalog {
  pub fn transformations(&self) -> &[Transformation] {
    &self.transformations
  }

  pub fn get(&self, name: &str) -> Option<&Transformation> {
    self.transformations.iter().find(|t| t.name == name)
  }

  /// Look up a transformation a stage depends on.
  pub fn require(&self, name: &str) -> Result<&Transformation, CatalogError> {
    self
      .get(name)
      .ok_or_else(|| CatalogError::TransformationNotFound(name.to_string()))
  }
}

/// Register one entry per distinct transformation name.
///
/// Registering a name again with the same executable is collapsed into the
/// first entry; a different executable is an error.
pub fn build_transformation_catalog(
  transformations: impl IntoIterator<Item = Transformation>,
) -> Result<TransformationCatalog, CatalogError> {
  let mut catalog = TransformationCatalog::default();

  for transformation in transformations {
    match catalog.get(&transformation.name) {
      Some(existing) if existing.pfn != transformation.pfn => {
        return Err(CatalogError::ConflictingTransformation {
          name: transformation.name,
          existing: existing.pfn.clone(),
          conflicting: transformation.pfn,
        });
      }
      Some(existing) => {
        if *existing != transformation {
          warn!(
            transformation = %transformation.name,
            "transformation registered twice with different settings, keeping the first"
          );
        }
      }
      None => {
        debug!(
          transformation = %transformation.name,
          pfn = %transformation.pfn.display(),
          "registered transformation"
        );
        catalog.transformations.push(transformation);
      }
    }
  }

  Ok(catalog)
}
