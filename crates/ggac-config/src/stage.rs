use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::site::Arch;

/// How one pipeline stage is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDef {
  /// Transformation name registered in the transformation catalog.
  pub transformation: String,

  /// Executable path. Relative paths are resolved against `bin_dir`.
  pub executable: PathBuf,

  /// Execution site selected for every task of this stage.
  pub site: String,

  /// Optional container image requested for every task of this stage.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub container_image: Option<String>,

  /// Site the executable is staged from.
  #[serde(default = "default_host_site")]
  pub host_site: String,

  #[serde(default)]
  pub arch: Arch,

  /// Profiles attached to the transformation (e.g. clustering).
  #[serde(default)]
  pub profiles: Vec<Profile>,
}

fn default_host_site() -> String {
  "local".to_string()
}

impl StageDef {
  pub fn new(
    transformation: impl Into<String>,
    executable: impl Into<PathBuf>,
    site: impl Into<String>,
  ) -> Self {
    Self {
      transformation: transformation.into(),
      executable: executable.into(),
      site: site.into(),
      container_image: None,
      host_site: default_host_site(),
      arch: Arch::default(),
      profiles: Vec::new(),
    }
  }
}

/// The three stages of every replicate chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagesDef {
  pub prepare: StageDef,
  pub simulate: StageDef,
  pub convert: StageDef,
}

impl StagesDef {
  pub fn iter(&self) -> impl Iterator<Item = &StageDef> {
    [&self.prepare, &self.simulate, &self.convert].into_iter()
  }
}
