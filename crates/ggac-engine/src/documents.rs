//! Documents handed to the planner.
//!
//! The schema is owned by the planner; these types only translate workflow and
//! catalog entities into it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ggac_catalog::{Directory, ReplicaCatalog, Site, SiteRole, Transformation};
use ggac_config::{Arch, Namespace, OsType, Profile};
use ggac_workflow::{Task, Workflow};
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use crate::error::EngineError;
use crate::properties::render_properties;
use crate::request::PlanRequest;

const SCHEMA_VERSION: &str = "5.0";

pub const SITES_FILE: &str = "sites.json";
pub const TRANSFORMATIONS_FILE: &str = "transformations.json";
pub const REPLICAS_FILE: &str = "replicas.json";
pub const WORKFLOW_FILE: &str = "workflow.json";
pub const PROPERTIES_FILE: &str = "pegasus.properties";

/// Locations of the written documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocuments {
  pub sites: PathBuf,
  pub transformations: PathBuf,
  pub replicas: PathBuf,
  pub workflow: PathBuf,
  pub properties: PathBuf,
}

impl PlanDocuments {
  pub fn in_dir(dir: &Path) -> Self {
    Self {
      sites: dir.join(SITES_FILE),
      transformations: dir.join(TRANSFORMATIONS_FILE),
      replicas: dir.join(REPLICAS_FILE),
      workflow: dir.join(WORKFLOW_FILE),
      properties: dir.join(PROPERTIES_FILE),
    }
  }
}

type ProfileMap<'a> = BTreeMap<Namespace, BTreeMap<&'a str, &'a str>>;

/// Profiles grouped by namespace, the way every planner document nests them.
fn profile_map(profiles: &[Profile]) -> ProfileMap<'_> {
  let mut map: ProfileMap<'_> = BTreeMap::new();
  for profile in profiles {
    map
      .entry(profile.namespace)
      .or_default()
      .insert(&profile.key, &profile.value);
  }
  map
}

#[derive(Serialize)]
struct SiteCatalogDocument<'a> {
  pegasus: &'static str,
  sites: Vec<SiteDocument<'a>>,
}

#[derive(Serialize)]
struct SiteDocument<'a> {
  name: &'a str,
  arch: Arch,
  #[serde(rename = "os.type", skip_serializing_if = "Option::is_none")]
  os_type: Option<OsType>,
  directories: &'a [Directory],
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  profiles: ProfileMap<'a>,
}

impl<'a> SiteDocument<'a> {
  fn from_site(site: &'a Site) -> Self {
    Self {
      name: &site.name,
      arch: site.arch,
      os_type: site.os_type,
      directories: &site.directories,
      profiles: profile_map(&site.profiles),
    }
  }
}

#[derive(Serialize)]
struct TransformationCatalogDocument<'a> {
  pegasus: &'static str,
  transformations: Vec<TransformationDocument<'a>>,
}

#[derive(Serialize)]
struct TransformationDocument<'a> {
  name: &'a str,
  sites: Vec<TransformationSiteDocument<'a>>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  profiles: ProfileMap<'a>,
}

#[derive(Serialize)]
struct TransformationSiteDocument<'a> {
  name: &'a str,
  pfn: &'a Path,
  #[serde(rename = "type")]
  kind: &'static str,
  arch: Arch,
}

impl<'a> TransformationDocument<'a> {
  fn from_transformation(transformation: &'a Transformation) -> Self {
    Self {
      name: &transformation.name,
      sites: vec![TransformationSiteDocument {
        name: &transformation.site,
        pfn: &transformation.pfn,
        kind: if transformation.is_stageable {
          "stageable"
        } else {
          "installed"
        },
        arch: transformation.arch,
      }],
      profiles: profile_map(&transformation.profiles),
    }
  }
}

#[derive(Serialize)]
struct ReplicaCatalogDocument<'a> {
  pegasus: &'static str,
  replicas: Vec<ReplicaDocument<'a>>,
}

#[derive(Serialize)]
struct ReplicaDocument<'a> {
  lfn: &'a str,
  pfns: Vec<PfnDocument<'a>>,
}

#[derive(Serialize)]
struct PfnDocument<'a> {
  site: &'a str,
  pfn: &'a Path,
}

impl<'a> ReplicaCatalogDocument<'a> {
  /// One entry per logical name, with every physical location listed under it.
  fn new(catalog: &'a ReplicaCatalog) -> Self {
    let mut replicas: Vec<ReplicaDocument<'a>> = Vec::with_capacity(catalog.len());
    for replica in catalog.replicas() {
      let pfn = PfnDocument {
        site: &replica.site,
        pfn: &replica.pfn,
      };
      match replicas.iter_mut().find(|r| r.lfn == replica.lfn) {
        Some(existing) => existing.pfns.push(pfn),
        None => replicas.push(ReplicaDocument {
          lfn: &replica.lfn,
          pfns: vec![pfn],
        }),
      }
    }

    Self {
      pegasus: SCHEMA_VERSION,
      replicas,
    }
  }
}

#[derive(Serialize)]
struct WorkflowDocument<'a> {
  pegasus: &'static str,
  name: &'a str,
  jobs: Vec<JobDocument<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobDocument<'a> {
  #[serde(rename = "type")]
  kind: &'static str,
  name: &'a str,
  id: &'a str,
  arguments: &'a [String],
  uses: Vec<UseDocument<'a>>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  profiles: ProfileMap<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UseDocument<'a> {
  lfn: &'a str,
  #[serde(rename = "type")]
  kind: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  stage_out: Option<bool>,
}

impl<'a> JobDocument<'a> {
  fn from_task(task: &'a Task) -> Self {
    let inputs = task.inputs().iter().map(|a| UseDocument {
      lfn: &a.logical_name,
      kind: "input",
      stage_out: None,
    });
    let outputs = task.outputs().iter().map(|a| UseDocument {
      lfn: &a.logical_name,
      kind: "output",
      stage_out: Some(true),
    });

    Self {
      kind: "job",
      name: task.transformation(),
      id: task.id(),
      arguments: task.arguments(),
      uses: inputs.chain(outputs).collect(),
      profiles: profile_map(task.profiles()),
    }
  }
}

impl<'a> WorkflowDocument<'a> {
  fn new(workflow: &'a Workflow) -> Self {
    Self {
      pegasus: SCHEMA_VERSION,
      name: workflow.name(),
      jobs: workflow.tasks().iter().map(JobDocument::from_task).collect(),
    }
  }
}

/// Write the catalogs, workflow and properties into `dir`.
///
/// The workflow is re-validated against the catalogs first, so a document
/// set never references a file, site or executable nothing provides.
pub async fn write_documents(
  dir: &Path,
  request: &PlanRequest<'_>,
) -> Result<PlanDocuments, EngineError> {
  request.workflow.validate(&request.replicas.artifacts())?;
  for task in request.workflow.tasks() {
    request.transformations.require(task.transformation())?;
  }
  for site in request.execution_sites {
    request.sites.require(site, SiteRole::Execution)?;
  }
  request.sites.require(request.output_site, SiteRole::Output)?;

  fs::create_dir_all(dir).await?;
  let documents = PlanDocuments::in_dir(dir);

  let sites = SiteCatalogDocument {
    pegasus: SCHEMA_VERSION,
    sites: request.sites.sites().iter().map(SiteDocument::from_site).collect(),
  };
  let transformations = TransformationCatalogDocument {
    pegasus: SCHEMA_VERSION,
    transformations: request
      .transformations
      .transformations()
      .iter()
      .map(TransformationDocument::from_transformation)
      .collect(),
  };

  write_json(&documents.sites, &sites).await?;
  write_json(&documents.transformations, &transformations).await?;
  write_json(&documents.replicas, &ReplicaCatalogDocument::new(request.replicas)).await?;
  write_json(&documents.workflow, &WorkflowDocument::new(request.workflow)).await?;

  let properties = render_properties(&request.options.properties, &documents);
  fs::write(&documents.properties, properties).await?;

  debug!(
    dir = %dir.display(),
    jobs = request.workflow.tasks().len(),
    "wrote planner documents"
  );

  Ok(documents)
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EngineError> {
  let content = serde_json::to_string_pretty(value)?;
  fs::write(path, content).await?;
  Ok(())
}
