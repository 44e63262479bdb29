use thiserror::Error;

/// Errors raised while assembling or validating a workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
  /// Group label cannot be embedded in artifact names.
  #[error("invalid parameter group '{label}': {reason}")]
  InvalidGroup { label: String, reason: &'static str },

  /// The same group label was given twice.
  #[error("duplicate parameter group: {0}")]
  DuplicateGroup(String),

  /// The macro template is not among the pre-registered replicas.
  #[error("config template '{0}' is not a registered replica")]
  MissingConfigTemplate(String),

  /// Two producers declared the same logical name.
  #[error("artifact name collision: '{name}' declared again by task '{task_id}'")]
  ArtifactCollision { name: String, task_id: String },

  /// A task consumes a name nothing has produced yet.
  #[error("task '{task_id}' references unavailable artifact '{name}'")]
  UnavailableArtifact { name: String, task_id: String },

  /// Two tasks share an id.
  #[error("duplicate task id: {0}")]
  DuplicateTaskId(String),
}

impl WorkflowError {
  /// Whether this error signals a defect in assembly rather than bad input.
  pub fn is_invariant_violation(&self) -> bool {
    matches!(
      self,
      WorkflowError::ArtifactCollision { .. }
        | WorkflowError::UnavailableArtifact { .. }
        | WorkflowError::DuplicateTaskId(_)
    )
  }
}
