use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ggac_catalog::{
  LOCAL_SITE, SiteRole, Transformation, build_replica_catalog, build_site_catalog,
  build_transformation_catalog,
};
use ggac_config::{GroupDef, Namespace, Profile, RunConfig, SiteDef};
use ggac_engine::{DryRunEngine, PegasusPlanner, PlanOptions, PlanRequest, WorkflowEngine};
use ggac_inputs::{Cascade, write_input_files};
use ggac_workflow::{
  AssemblyParams, GraphAssembler, GroupPlan, ParameterGroup, StageBindings, WorkflowError,
};

/// GGAC - builds and plans the gamma-gamma surface simulation campaign
#[derive(Parser)]
#[command(name = "ggac")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the campaign config file (JSON). Built-in defaults apply when omitted.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Log at debug level unless RUST_LOG is set
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Assemble the workflow and hand it to the planner
  Plan(PlanArgs),

  /// Write the physics-parameter files for one gamma cascade
  WriteInputs(WriteInputsArgs),
}

#[derive(Args)]
struct PlanArgs {
  /// Parameter groups, comma separated (overrides the config)
  #[arg(long, value_delimiter = ',')]
  groups: Vec<String>,

  /// Simulation jobs per group (overrides the config)
  #[arg(long)]
  jobs: Option<u32>,

  /// Directory holding the input files registered as replicas
  #[arg(long)]
  input_dir: Option<PathBuf>,

  /// Working directory for catalogs and runs (default: ~/workflows)
  #[arg(long)]
  work_dir: Option<PathBuf>,

  /// Submit the workflow right after planning
  #[arg(long)]
  submit: bool,

  /// Write catalogs and workflow without invoking the planner
  #[arg(long, conflicts_with = "submit")]
  dry_run: bool,
}

#[derive(Args)]
struct WriteInputsArgs {
  /// Element (atomic) number
  #[arg(short = 'z')]
  z: u32,

  /// Isotope number
  #[arg(short = 'a')]
  a: u32,

  /// First gamma energy in cascade [keV]
  #[arg(long = "g1")]
  g1: f64,

  /// Second gamma energy in cascade [keV]
  #[arg(long = "g2")]
  g2: f64,

  /// Directory to write into (default: the config's input directory)
  #[arg(long)]
  input_dir: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));
  init_tracing(cli.verbose);

  match cli.command {
    Some(Commands::Plan(args)) => {
      run_plan(cli.config, args)?;
      Ok(ExitCode::SUCCESS)
    }
    Some(Commands::WriteInputs(args)) => run_write_inputs(cli.config, args),
    None => {
      println!("ggac - use --help to see available commands");
      Ok(ExitCode::SUCCESS)
    }
  }
}

/// The parameter-file tool historically took `-g1`/`-g2`; clap spells them `--g1`/`--g2`.
fn normalize_legacy_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
  args
    .into_iter()
    .map(|arg| match arg.to_str() {
      Some("-g1") => OsString::from("--g1"),
      Some("-g2") => OsString::from("--g2"),
      _ => arg,
    })
    .collect()
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
    .with_writer(std::io::stderr)
    .init();
}

async fn load_config(path: Option<&Path>) -> Result<RunConfig> {
  let Some(path) = path else {
    return Ok(RunConfig::default());
  };

  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read config file: {}", path.display()))?;

  RunConfig::from_json(&content)
    .with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn run_plan(config_path: Option<PathBuf>, args: PlanArgs) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_plan_async(config_path, args).await })
}

async fn run_plan_async(config_path: Option<PathBuf>, args: PlanArgs) -> Result<()> {
  let mut config = load_config(config_path.as_deref()).await?;

  if !args.groups.is_empty() {
    config.groups = args.groups.iter().map(GroupDef::new).collect();
  }
  if let Some(jobs) = args.jobs {
    config.jobs_per_group = jobs;
  }
  if let Some(input_dir) = args.input_dir {
    config.input_dir = input_dir;
  }
  if let Some(work_dir) = args.work_dir {
    config.work_dir = Some(work_dir);
  }
  config.submit |= args.submit;

  // Site URLs embed the work dir, so it has to be absolute.
  let work_dir = std::path::absolute(config.work_dir()).context("failed to resolve work dir")?;
  info!(workflow = %config.name, work_dir = %work_dir.display(), "loaded configuration");

  // Every configuration error surfaces here, before any task is built.
  let mut site_defs = config.resolved_sites(&work_dir);
  inherit_path(&mut site_defs);

  let sites = build_site_catalog(&site_defs).context("invalid site configuration")?;
  for name in &config.execution_sites {
    sites.require(name, SiteRole::Execution)?;
  }
  sites.require(&config.output_site, SiteRole::Output)?;

  for stage in config.stages.iter() {
    if !config.execution_sites.contains(&stage.site) {
      bail!(
        "transformation '{}' runs on '{}', which is not an execution site",
        stage.transformation,
        stage.site
      );
    }
  }

  let transformations = build_transformation_catalog(
    config
      .stages
      .iter()
      .map(|s| Transformation::for_stage(s, config.executable_path(s))),
  )
  .context("invalid transformation configuration")?;

  let replicas = build_replica_catalog(&config.input_dir)
    .await
    .context("failed to register input files")?;
  info!(replicas = replicas.len(), "registered input files");

  let groups = config
    .groups
    .iter()
    .map(|g| {
      let group = ParameterGroup::new(g.label.as_str())?;
      Ok(match g.jobs {
        Some(jobs) => GroupPlan::with_jobs(group, jobs),
        None => GroupPlan::new(group),
      })
    })
    .collect::<Result<Vec<_>, WorkflowError>>()?;

  let workflow = GraphAssembler::new(StageBindings::from(&config.stages))
    .assemble(&AssemblyParams {
      name: config.name.clone(),
      groups,
      jobs_per_group: config.jobs_per_group,
      config_template: config.config_template.clone(),
      replicas: replicas.artifacts(),
    })
    .context("failed to assemble workflow")?;

  let graph = workflow.graph();
  info!(
    tasks = workflow.tasks().len(),
    entry_points = graph.entry_points().len(),
    edges = graph.edge_count(),
    "workflow graph ready"
  );

  let options = PlanOptions {
    run_dir: work_dir.join("runs"),
    submit: config.submit,
    properties: config.properties.clone(),
  };

  let engine: Box<dyn WorkflowEngine> = if args.dry_run {
    Box::new(DryRunEngine::new(&work_dir))
  } else {
    Box::new(PegasusPlanner::new(&config.planner, &work_dir))
  };

  let result = engine
    .plan(PlanRequest {
      workflow: &workflow,
      sites: &sites,
      transformations: &transformations,
      replicas: &replicas,
      execution_sites: &config.execution_sites,
      output_site: &config.output_site,
      options: &options,
    })
    .await
    .context("planning failed")?;

  if !result.output.is_empty() {
    print!("{}", result.output);
  }
  match &result.submit_dir {
    Some(dir) => info!(submit_dir = %dir.display(), submitted = result.submitted, "workflow planned"),
    None => info!(workflow = %result.documents.workflow.display(), "workflow documents written"),
  }

  Ok(())
}

/// Jobs on the submit host inherit its `PATH` unless the config sets one.
fn inherit_path(sites: &mut [SiteDef]) {
  let Some(path) = std::env::var_os("PATH") else {
    return;
  };

  if let Some(local) = sites.iter_mut().find(|s| s.name == LOCAL_SITE)
    && !local
      .profiles
      .iter()
      .any(|p| p.namespace == Namespace::Env && p.key == "PATH")
  {
    local
      .profiles
      .push(Profile::env("PATH", path.to_string_lossy()));
  }
}

fn run_write_inputs(config_path: Option<PathBuf>, args: WriteInputsArgs) -> Result<ExitCode> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_write_inputs_async(config_path, args).await })
}

async fn run_write_inputs_async(
  config_path: Option<PathBuf>,
  args: WriteInputsArgs,
) -> Result<ExitCode> {
  let input_dir = match args.input_dir {
    Some(dir) => dir,
    None => load_config(config_path.as_deref()).await?.input_dir,
  };

  let cascade = Cascade {
    z: args.z,
    a: args.a,
    gamma_1: args.g1,
    gamma_2: args.g2,
  };

  let report = write_input_files(&input_dir, &cascade).await;
  if report.is_complete() {
    Ok(ExitCode::SUCCESS)
  } else {
    warn!(
      written = report.written.len(),
      failed = report.failures.len(),
      "parameter files incomplete"
    );
    Ok(ExitCode::FAILURE)
  }
}
