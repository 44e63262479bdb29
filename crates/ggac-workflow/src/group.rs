use std::fmt;

use serde::Serialize;

use crate::error::WorkflowError;

/// Opaque label partitioning a run, e.g. an isotope/energy bucket like `Z2`.
///
/// Labels are embedded in file names, so they must be non-empty and free of
/// whitespace and path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ParameterGroup(String);

impl ParameterGroup {
  pub fn new(label: impl Into<String>) -> Result<Self, WorkflowError> {
    let label = label.into();

    let reason = if label.is_empty() {
      Some("label is empty")
    } else if label.chars().any(char::is_whitespace) {
      Some("label contains whitespace")
    } else if label.contains(['/', '\\']) {
      Some("label contains a path separator")
    } else {
      None
    };

    match reason {
      Some(reason) => Err(WorkflowError::InvalidGroup { label, reason }),
      None => Ok(Self(label)),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ParameterGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// A group together with its replicate count override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
  pub group: ParameterGroup,
  pub jobs: Option<u32>,
}

impl GroupPlan {
  pub fn new(group: ParameterGroup) -> Self {
    Self { group, jobs: None }
  }

  pub fn with_jobs(group: ParameterGroup, jobs: u32) -> Self {
    Self {
      group,
      jobs: Some(jobs),
    }
  }
}
