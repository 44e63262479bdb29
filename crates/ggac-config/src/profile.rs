use serde::{Deserialize, Serialize};

/// Profile namespace understood by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
  Pegasus,
  Condor,
  Dagman,
  Env,
  Selector,
}

/// A single `namespace.key = value` profile attached to a site, transformation or task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub namespace: Namespace,
  pub key: String,
  pub value: String,
}

impl Profile {
  pub fn new(namespace: Namespace, key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      namespace,
      key: key.into(),
      value: value.into(),
    }
  }

  pub fn pegasus(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(Namespace::Pegasus, key, value)
  }

  pub fn condor(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(Namespace::Condor, key, value)
  }

  pub fn env(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(Namespace::Env, key, value)
  }

  pub fn selector(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self::new(Namespace::Selector, key, value)
  }
}
