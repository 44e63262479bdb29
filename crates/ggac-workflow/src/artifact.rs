use serde::Serialize;

/// A file reference, identified by its logical name.
///
/// `producer` is `None` for pre-registered replicas and holds the id of the
/// producing task for everything generated inside the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Artifact {
  pub logical_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub producer: Option<String>,
}

impl Artifact {
  /// A pre-existing input file registered in the replica catalog.
  pub fn replica(logical_name: impl Into<String>) -> Self {
    Self {
      logical_name: logical_name.into(),
      producer: None,
    }
  }

  /// A file produced by the given task.
  pub fn produced(logical_name: impl Into<String>, producer: impl Into<String>) -> Self {
    Self {
      logical_name: logical_name.into(),
      producer: Some(producer.into()),
    }
  }
}
