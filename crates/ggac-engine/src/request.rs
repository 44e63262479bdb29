use std::path::PathBuf;

use ggac_catalog::{ReplicaCatalog, SiteCatalog, TransformationCatalog};
use ggac_config::PlannerProperties;
use ggac_workflow::Workflow;

use crate::documents::PlanDocuments;

/// Options passed through to the planner unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
  /// Directory the planner creates submit directories under.
  pub run_dir: PathBuf,
  /// Submit right after planning.
  pub submit: bool,
  pub properties: PlannerProperties,
}

/// Everything the planner needs for one workflow.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
  pub workflow: &'a Workflow,
  pub sites: &'a SiteCatalog,
  pub transformations: &'a TransformationCatalog,
  pub replicas: &'a ReplicaCatalog,
  pub execution_sites: &'a [String],
  pub output_site: &'a str,
  pub options: &'a PlanOptions,
}

/// What the planner reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanResult {
  /// Documents written for the planner.
  pub documents: PlanDocuments,
  /// Submit directory announced by the planner, if any.
  pub submit_dir: Option<PathBuf>,
  /// Whether the planner was asked to submit.
  pub submitted: bool,
  /// Planner stdout.
  pub output: String,
}
