use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::site::{DirectoryDef, DirectoryKind, OsType, SiteDef};
use crate::stage::{StageDef, StagesDef};

/// Placeholder expanded to the working directory in site paths and URLs.
pub const WORK_DIR_PLACEHOLDER: &str = "${WORK_DIR}";

/// A parameter group, optionally overriding the global job count.
///
/// Accepts either a bare label (`"Z2"`) or an object
/// (`{"label": "Z2", "jobs": 4}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GroupEntry")]
pub struct GroupDef {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jobs: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupEntry {
  Label(String),
  Detailed { label: String, jobs: Option<u32> },
}

impl From<GroupEntry> for GroupDef {
  fn from(entry: GroupEntry) -> Self {
    match entry {
      GroupEntry::Label(label) => GroupDef { label, jobs: None },
      GroupEntry::Detailed { label, jobs } => GroupDef { label, jobs },
    }
  }
}

impl GroupDef {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      jobs: None,
    }
  }
}

/// Static settings handed through to the planner. None of these are
/// interpreted by the workflow builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerProperties {
  /// Retry count for failed jobs (`dagman.retry`).
  pub retry: u32,
  /// Cap on idle jobs (`dagman.maxidle`).
  pub max_idle: u32,
  /// Cap on running jobs (`dagman.maxjobs`).
  pub max_jobs: u32,
  pub monitord_encoding: String,
  pub gridstart_arguments: String,
  /// Additional properties written verbatim.
  pub extra: BTreeMap<String, String>,
}

impl Default for PlannerProperties {
  fn default() -> Self {
    Self {
      retry: 3,
      max_idle: 1000,
      max_jobs: 1000,
      monitord_encoding: "json".to_string(),
      gridstart_arguments: "-f".to_string(),
      extra: BTreeMap::new(),
    }
  }
}

/// Full configuration of one campaign submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
  /// Workflow name.
  pub name: String,

  /// Working directory for catalogs, runs and scratch space
  /// (default: ~/workflows).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub work_dir: Option<PathBuf>,

  /// Directory holding the physics-parameter files and the macro template.
  pub input_dir: PathBuf,

  /// Directory relative executable paths are resolved against.
  pub bin_dir: PathBuf,

  /// Logical name of the run-macro template every preparation task reads.
  pub config_template: String,

  pub groups: Vec<GroupDef>,

  /// Simulation replicates per group unless a group overrides it.
  pub jobs_per_group: u32,

  pub stages: StagesDef,

  pub sites: Vec<SiteDef>,

  /// Sites the planner may schedule jobs on.
  pub execution_sites: Vec<String>,

  /// Site outputs are staged to.
  pub output_site: String,

  /// Submit the planned workflow immediately.
  pub submit: bool,

  /// Planner executable.
  pub planner: PathBuf,

  pub properties: PlannerProperties,
}

impl Default for RunConfig {
  fn default() -> Self {
    let mut convert = StageDef::new("ntuple", "run_ntuple", "condorpool_ntuple");
    convert.profiles.push(Profile::pegasus("clusters.size", "1"));

    Self {
      name: "ggac_surface-workflow".to_string(),
      work_dir: None,
      input_dir: PathBuf::from("inputs"),
      bin_dir: PathBuf::from("bin"),
      config_template: "template.mac".to_string(),
      groups: ["Z0", "Z2", "Z4"].into_iter().map(GroupDef::new).collect(),
      jobs_per_group: 10,
      stages: StagesDef {
        prepare: StageDef::new("prepare", "prepare_macro", "condorpool_simulation"),
        simulate: StageDef::new("simulation", "run_simulation", "condorpool_simulation"),
        convert,
      },
      sites: default_sites(),
      execution_sites: vec![
        "condorpool_simulation".to_string(),
        "condorpool_ntuple".to_string(),
      ],
      output_site: "remote".to_string(),
      submit: false,
      planner: PathBuf::from("pegasus-plan"),
      properties: PlannerProperties::default(),
    }
  }
}

impl RunConfig {
  /// Parse a configuration document. Missing fields take their defaults.
  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }

  /// Default working directory: `~/workflows`.
  pub fn default_work_dir() -> PathBuf {
    dirs::home_dir()
      .unwrap_or_else(|| PathBuf::from("."))
      .join("workflows")
  }

  /// The configured working directory, or the default one.
  pub fn work_dir(&self) -> PathBuf {
    self
      .work_dir
      .clone()
      .unwrap_or_else(Self::default_work_dir)
  }

  /// Job count for a group, honoring its override.
  pub fn jobs_for(&self, group: &GroupDef) -> u32 {
    group.jobs.unwrap_or(self.jobs_per_group)
  }

  /// Resolve a stage executable against `bin_dir`.
  pub fn executable_path(&self, stage: &StageDef) -> PathBuf {
    if stage.executable.is_absolute() {
      stage.executable.clone()
    } else {
      self.bin_dir.join(&stage.executable)
    }
  }

  /// Site definitions with `${WORK_DIR}` expanded.
  pub fn resolved_sites(&self, work_dir: &Path) -> Vec<SiteDef> {
    let work_dir = work_dir.to_string_lossy();
    let expand = |s: &str| s.replace(WORK_DIR_PLACEHOLDER, &work_dir);

    self
      .sites
      .iter()
      .cloned()
      .map(|mut site| {
        for directory in &mut site.directories {
          directory.path = PathBuf::from(expand(&directory.path.to_string_lossy()));
          for server in &mut directory.file_servers {
            server.url = expand(&server.url);
          }
        }
        site
      })
      .collect()
  }
}

fn condor_pool(name: &str, image: &str) -> SiteDef {
  SiteDef::new(name)
    .with_os(OsType::Linux)
    .with_profile(Profile::pegasus("style", "condor"))
    .with_profile(Profile::condor("universe", "vanilla"))
    .with_profile(Profile::condor("requirements", "HAS_SINGULARITY == TRUE"))
    .with_profile(Profile::condor("request_cpus", "1"))
    .with_profile(Profile::condor("request_memory", "1 GB"))
    .with_profile(Profile::condor("request_disk", "1 GB"))
    .with_profile(Profile::condor("+SingularityImage", format!("\"{image}\"")))
}

fn default_sites() -> Vec<SiteDef> {
  let local = SiteDef::new("local")
    .with_directory(
      DirectoryDef::new(DirectoryKind::SharedScratch, "${WORK_DIR}/scratch")
        .with_file_server("file://${WORK_DIR}/scratch"),
    )
    .with_directory(
      DirectoryDef::new(DirectoryKind::LocalStorage, "${WORK_DIR}/outputs")
        .with_file_server("file://${WORK_DIR}/outputs"),
    );

  let remote = SiteDef::new("remote").with_os(OsType::Linux).with_directory(
    DirectoryDef::new(DirectoryKind::LocalStorage, "/data_fast/cnatzke/")
      .with_file_server("scp://cronos.mines.edu/data_fast/cnatzke"),
  );

  vec![
    local,
    condor_pool(
      "condorpool_simulation",
      "/cvmfs/singularity.opensciencegrid.org/cnatzke/griffin_simulation:geant4.10.01",
    ),
    condor_pool(
      "condorpool_ntuple",
      "/cvmfs/singularity.opensciencegrid.org/cnatzke/ntuple:ggac_surface",
    ),
    remote,
  ]
}
