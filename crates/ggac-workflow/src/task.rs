use ggac_config::Profile;
use serde::Serialize;

use crate::artifact::Artifact;
use crate::naming::Stage;

/// One job in the workflow.
///
/// Tasks are built once by the assembler and never mutated afterwards, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
  id: String,
  stage: Stage,
  transformation: String,
  arguments: Vec<String>,
  inputs: Vec<Artifact>,
  outputs: Vec<Artifact>,
  profiles: Vec<Profile>,
}

impl Task {
  pub(crate) fn new(
    id: String,
    stage: Stage,
    transformation: String,
    arguments: Vec<String>,
    inputs: Vec<Artifact>,
    outputs: Vec<Artifact>,
    profiles: Vec<Profile>,
  ) -> Self {
    Self {
      id,
      stage,
      transformation,
      arguments,
      inputs,
      outputs,
      profiles,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn stage(&self) -> Stage {
    self.stage
  }

  /// Name of the transformation this task runs.
  pub fn transformation(&self) -> &str {
    &self.transformation
  }

  pub fn arguments(&self) -> &[String] {
    &self.arguments
  }

  pub fn inputs(&self) -> &[Artifact] {
    &self.inputs
  }

  pub fn outputs(&self) -> &[Artifact] {
    &self.outputs
  }

  /// Execution-environment profiles (site selection, container image).
  pub fn profiles(&self) -> &[Profile] {
    &self.profiles
  }
}
